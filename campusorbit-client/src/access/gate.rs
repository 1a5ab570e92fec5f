use crate::session::{AccountType, Role, SessionState, UserIdentity};

use super::types::{Capability, Route, RouteDecision, RouteRequirement};

/// Capabilities held by an identity
///
/// The owner special case is derived here and nowhere else: a teacher who
/// owns a tuition-centre tenant additionally holds `TuitionOwner`.
pub fn capabilities_of(identity: &UserIdentity) -> Vec<Capability> {
    let mut capabilities = match identity.role {
        Role::PlatformAdmin => vec![Capability::PlatformAdmin],
        Role::SchoolAdmin => vec![Capability::SchoolAdmin],
        Role::AccountAdmin => vec![Capability::AccountAdmin],
        Role::Teacher => vec![Capability::Teacher],
        Role::Student => vec![Capability::Student],
        Role::Unknown => Vec::new(),
    };

    if identity.role == Role::Teacher
        && identity.is_owner
        && identity.account_type == Some(AccountType::Tuition)
    {
        capabilities.push(Capability::TuitionOwner);
    }

    capabilities
}

/// Whether `identity` may enter a region gated by `requirement`
pub fn is_admitted(identity: Option<&UserIdentity>, requirement: &RouteRequirement) -> bool {
    let Some(identity) = identity else {
        return false;
    };
    if requirement.allowed.is_empty() {
        return true;
    }
    capabilities_of(identity)
        .iter()
        .any(|capability| requirement.allowed.contains(capability))
}

/// Landing page for a role; unrecognized roles land on the login surface
pub fn home_route_for(role: Role) -> Route {
    match role {
        Role::PlatformAdmin => Route::PlatformDashboard,
        Role::SchoolAdmin => Route::SchoolDashboard,
        Role::AccountAdmin => Route::FeeRecords,
        Role::Teacher => Route::TeacherDashboard,
        Role::Student => Route::StudentDashboard,
        Role::Unknown => Route::Login,
    }
}

/// The protected-route algorithm
///
/// While the identity is unknown the decision stays pending; anonymous
/// visitors go to login, misrouted accounts go to their home route.
pub fn decide(state: &SessionState, requirement: &RouteRequirement) -> RouteDecision {
    match state {
        SessionState::Bootstrapping => RouteDecision::Pending,
        SessionState::Anonymous => RouteDecision::ToLogin,
        SessionState::Authenticated(identity) => {
            if is_admitted(Some(identity), requirement) {
                RouteDecision::Admit
            } else {
                RouteDecision::ToHome
            }
        }
    }
}
