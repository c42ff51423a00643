use axum::{
    Json,
    extract::{Path, State},
};

use crate::db::models::VolunteerProgram;
use crate::error::SproutError;
use crate::router::SproutState;

/// Fetch one program's detail from the upstream listings service, cache
/// the normalized record, and return it. An empty upstream result is a
/// 404, not an error page from the third party.
pub async fn fetch_program(
    State(state): State<SproutState>,
    Path(program_id): Path<String>,
) -> Result<Json<VolunteerProgram>, SproutError> {
    let records = state.listings.fetch_detail(&program_id).await?;
    let Some(program) = records.into_iter().next() else {
        return Err(SproutError::NotFound);
    };
    state.volunteers.insert_if_absent(&program).await?;
    Ok(Json(program))
}
