/// Image Conversion Service - HTTP Server
///
/// Serves on-demand resize/transcode of generated images stored in the blob store.
use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use image_conversion_service::handlers;
use image_conversion_service::logging;
use image_conversion_service::middleware::MetricsMiddleware;
use image_conversion_service::services::{
    HttpImageFetcher, ImageConversionService, ImageProcessor, ProcessorConfig,
};
use image_conversion_service::Config;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let fetcher = HttpImageFetcher::from_config(&config.fetch)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let processor = ImageProcessor::new(ProcessorConfig {
        jpeg_quality: config.encoding.jpeg_quality,
        ..ProcessorConfig::default()
    });
    let conversion = ImageConversionService::new(Arc::new(fetcher), Arc::new(processor));

    let bind_address = (config.app.host.clone(), config.app.port);
    tracing::info!(
        host = %config.app.host,
        port = config.app.port,
        env = %config.app.env,
        "Image conversion service starting HTTP server"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(conversion.clone()))
            .wrap(MetricsMiddleware)
            .wrap(actix_middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await?;

    tracing::info!("Image conversion service shutting down");
    Ok(())
}
