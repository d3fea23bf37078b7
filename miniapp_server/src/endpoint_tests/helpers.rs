use actix_web::{
    cookie::Cookie,
    http::StatusCode,
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use serde_json::Value;

use crate::config::ServerOptions;

/// Options for a fully configured test deployment. Individual tests override the flags to simulate
/// missing deployment configuration.
pub fn test_options() -> ServerOptions {
    ServerOptions { secure_cookies: false, provider_configured: true, has_app_id: true }
}

/// Posts `body` to `path` on a service built by `configure`, optionally attaching a request cookie.
/// Returns the response status, the response cookies and the parsed JSON body (Null when the body is
/// not JSON).
pub async fn post_request(
    path: &str,
    body: Option<Value>,
    cookie: Option<Cookie<'static>>,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, Vec<Cookie<'static>>, Value) {
    let mut req = TestRequest::post().uri(path);
    if let Some(body) = body {
        req = req.set_json(body);
    }
    if let Some(cookie) = cookie {
        req = req.cookie(cookie);
    }
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let cookies = res.response().cookies().map(|c| c.into_owned()).collect::<Vec<_>>();
    let body = test::read_body(res).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, cookies, json)
}

pub fn nonce_cookie(value: &str) -> Cookie<'static> {
    Cookie::new(crate::data_objects::PAYMENT_NONCE_COOKIE, value.to_string())
}
