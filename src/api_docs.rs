use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::search_books,
        api::books::create_book,
        api::books::get_book,
        api::books::update_book,
        api::books::delete_book,
        api::books::enrich_book,
    ),
    tags(
        (name = "library-catalog", description = "Library catalog API")
    )
)]
pub struct ApiDoc;
