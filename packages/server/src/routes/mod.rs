use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{bathroom_log, dog, feeding, health};
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health::welcome))
        .routes(routes!(health::health))
        .merge(dog_routes())
        .merge(bathroom_log_routes())
        .merge(feeding_routes())
}

fn dog_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(dog::list_dogs, dog::create_dog))
        .routes(routes!(dog::get_dog, dog::update_dog, dog::delete_dog))
        .routes(routes!(bathroom_log::list_dog_bathroom_logs))
        .routes(routes!(feeding::list_dog_feedings))
}

fn bathroom_log_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            bathroom_log::list_bathroom_logs,
            bathroom_log::create_bathroom_log
        ))
        .routes(routes!(bathroom_log::bathroom_stats))
        .routes(routes!(
            bathroom_log::get_bathroom_log,
            bathroom_log::update_bathroom_log,
            bathroom_log::delete_bathroom_log
        ))
}

fn feeding_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(feeding::list_feedings, feeding::create_feeding))
        .routes(routes!(
            feeding::get_feeding,
            feeding::update_feeding,
            feeding::delete_feeding
        ))
}
