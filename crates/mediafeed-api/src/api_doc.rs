//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use mediafeed_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediafeed API",
        version = "0.1.0",
        description = "Upload images and videos with a caption and read them back as a newest-first feed."
    ),
    paths(
        handlers::upload::upload_post,
        handlers::feed::get_feed,
    ),
    components(schemas(
        models::Post,
        models::PostView,
        models::FeedResponse,
        models::FileType,
        error::ErrorResponse,
    )),
    tags(
        (name = "posts", description = "Post upload and feed")
    )
)]
pub struct ApiDoc;
