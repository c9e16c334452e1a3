//! Dashboard handler.

use actix_web::{get, web};

use crate::domain::{Dashboard, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Current balance and credit history, newest first.
#[utoipa::path(
    get,
    path = "/user/dashboard",
    responses(
        (status = 200, description = "Balance and history", body = Dashboard),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getDashboard"
)]
#[get("/user/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Dashboard>> {
    let caller = session.require_user_id()?;
    Ok(web::Json(state.dashboard.dashboard(&caller).await?))
}
