// src/middleware/role.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::{Role, User},
};

/// Um conjunto de papéis aceitos por uma rota.
pub trait RoleDef: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
}

/// Guardião por papel. Entrega o usuário já verificado ao handler.
/// Sem usuário autenticado -> 401; papel errado -> 403.
pub struct RequireRole<R> {
    pub user: User,
    _role: PhantomData<R>,
}

impl<R, S> FromRequestParts<S> for RequireRole<R>
where
    R: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !R::allows(user.role) {
            tracing::debug!("Acesso negado para {} ({:?})", user.id, user.role);
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole { user, _role: PhantomData })
    }
}

// ---
// PAPÉIS
// ---

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn allows(role: Role) -> bool { role == Role::Admin }
}

pub struct EmployeeOnly;
impl RoleDef for EmployeeOnly {
    fn allows(role: Role) -> bool { role == Role::Employee }
}

pub struct CustomerOnly;
impl RoleDef for CustomerOnly {
    fn allows(role: Role) -> bool { role == Role::Customer }
}

pub struct StaffOrAdmin;
impl RoleDef for StaffOrAdmin {
    fn allows(role: Role) -> bool { matches!(role, Role::Admin | Role::Employee) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_marker_accepts_only_its_roles() {
        assert!(AdminOnly::allows(Role::Admin));
        assert!(!AdminOnly::allows(Role::Employee));
        assert!(EmployeeOnly::allows(Role::Employee));
        assert!(!EmployeeOnly::allows(Role::Admin));
        assert!(CustomerOnly::allows(Role::Customer));
        assert!(!CustomerOnly::allows(Role::Employee));
        assert!(StaffOrAdmin::allows(Role::Admin));
        assert!(StaffOrAdmin::allows(Role::Employee));
        assert!(!StaffOrAdmin::allows(Role::Customer));
    }
}
