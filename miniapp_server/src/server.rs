use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use worldcoin_tools::DevPortalApi;

use crate::{
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    routes::{confirm_payment, health, initiate_payment, verify_proof},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let srv = create_server_instance(config)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig) -> Result<Server, ServerError> {
    let api = DevPortalApi::new(config.dev_portal.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let options = ServerOptions::from_config(&config);
    let srv = HttpServer::new(move || {
        let api_scope = web::scope("/api")
            .service(web::resource("/initiate-payment").route(web::post().to(initiate_payment)))
            .service(web::resource("/confirm-payment").route(web::post().to(confirm_payment::<DevPortalApi>)))
            .service(web::resource("/verify").route(web::post().to(verify_proof::<DevPortalApi>)));
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("wmp::access_log"))
            .app_data(web::Data::new(api.clone()))
            .app_data(web::Data::new(options))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
