/// Everything a route can require: the five account roles plus the
/// derived tuition-owner token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    PlatformAdmin,
    SchoolAdmin,
    AccountAdmin,
    Teacher,
    Student,
    /// Teacher who owns a tuition-centre tenant; derived, never stored
    TuitionOwner,
}

/// Capability set attached to a navigable region
///
/// An empty set means the region is open to any authenticated account.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequirement {
    pub allowed: Vec<Capability>,
}

impl RouteRequirement {
    pub fn new(allowed: Vec<Capability>) -> Self {
        Self { allowed }
    }

    /// Open to any authenticated account
    pub fn authenticated() -> Self {
        Self::new(Vec::new())
    }

    /// The platform-administration surface
    pub fn platform() -> Self {
        Self::new(vec![Capability::PlatformAdmin])
    }

    /// The school-administration surface, shared with accountants and
    /// tuition owners
    pub fn school() -> Self {
        Self::new(vec![
            Capability::SchoolAdmin,
            Capability::AccountAdmin,
            Capability::TuitionOwner,
        ])
    }

    /// The teacher surface
    pub fn teacher() -> Self {
        Self::new(vec![Capability::Teacher])
    }

    /// The student surface
    pub fn student() -> Self {
        Self::new(vec![Capability::Student])
    }
}

/// Landing surfaces the client can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    PlatformDashboard,
    SchoolDashboard,
    FeeRecords,
    TeacherDashboard,
    StudentDashboard,
    Login,
}

impl Route {
    /// Path understood by the navigation shell
    pub fn path(&self) -> &'static str {
        match self {
            Self::PlatformDashboard => "/platform/dashboard",
            Self::SchoolDashboard => "/school/dashboard",
            Self::FeeRecords => "/school/fees",
            Self::TeacherDashboard => "/teacher/dashboard",
            Self::StudentDashboard => "/student/dashboard",
            Self::Login => "/login",
        }
    }
}

/// Outcome of checking a session state against a route requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Identity not yet known; show a neutral loading surface
    Pending,
    /// Admitted to the region
    Admit,
    /// Not signed in; go to the login surface
    ToLogin,
    /// Signed in but not allowed here; go to the role's home route
    ToHome,
}
