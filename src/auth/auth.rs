use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};

/// Caller identity, placed in request extensions by
/// [`auth_middleware`](crate::auth::middleware::auth_middleware).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Missing token")),
        )
    }
}

impl AuthUser {
    pub fn own_employee_id(&self) -> actix_web::Result<u64> {
        self.employee_id
            .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))
    }

    /// Resolves whose attendance a request is about. Only supervisory roles
    /// may look at someone else.
    pub fn resolve_subject(&self, requested: Option<u64>) -> actix_web::Result<u64> {
        match requested {
            None => self.own_employee_id(),
            Some(id) if self.employee_id == Some(id) => Ok(id),
            Some(id) if self.role.is_supervisor() => Ok(id),
            Some(_) => Err(actix_web::error::ErrorForbidden(
                "Only supervisors can view other employees",
            )),
        }
    }
}
