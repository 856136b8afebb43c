use utoipa::OpenApi;

use crate::routes::{health, interview};

#[derive(OpenApi)]
#[openapi(info(
    title = "prepcoach-server",
    description = "Interview-preparation coaching API",
    version = "0.1.0",
    contact(name = "prepcoach", url = "https://github.com/prepcoach/prepcoach")
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(interview::InterviewApi::openapi());
    root
}
