use utoipa::OpenApi;
use crate::config;
use crate::controllers::{estimate_controller, settings_controller};
use crate::models::sizing;

#[derive(OpenApi)]
#[openapi(
    paths(
        estimate_controller::estimate,
        estimate_controller::estimate_batch,
        estimate_controller::estimate_candidates,
        settings_controller::get_health,
        settings_controller::get_modes,
        settings_controller::set_modes
    ),
    components(
        schemas(
            sizing::HouseholdRecord,
            sizing::OutputRecord,
            sizing::Recommendation,
            sizing::CandidateTable,
            sizing::BatchResponse,
            sizing::ModeSettings,
            sizing::ModeUpdate,
            sizing::HealthStatus,
            config::RateMode,
            config::OutputMode
        )
    ),
    tags(
        (name = "solar-sizer", description = "Solar system sizing API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/estimate",
            "/api/estimate/batch",
            "/api/estimate/candidates",
            "/api/health",
            "/api/settings/modes",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
