use crate::{
    configuration::RunnerConfiguration, credentials::EnvironmentSettings, error::Error, render,
    run_log::RunLog, runner,
};
use hyper::{
    header::CONTENT_TYPE,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};
use std::{convert::Infallible, future::Future, net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Shared state of the web surface.
#[derive(Debug)]
pub struct DemoApp {
    configuration: RunnerConfiguration,
    settings: EnvironmentSettings,
    run_lock: Mutex<()>,
}

impl DemoApp {
    pub fn new(configuration: RunnerConfiguration, settings: EnvironmentSettings) -> Self {
        Self {
            configuration,
            settings,
            run_lock: Mutex::new(()),
        }
    }

    /// Runs the demo once. Concurrent callers wait for each other, so runs never interleave
    /// against the same remote resources.
    pub async fn run_demo(&self) -> RunLog {
        let _guard = self.run_lock.lock().await;
        let log = runner::run_demo(&self.configuration, &self.settings).await;

        // the console sink mirrors the page
        println!("{}", render::render(log.entries()).console);

        log
    }
}

/// Serves `GET /` and `GET /databasetest` until `shutdown` resolves.
pub async fn serve<F: Future<Output = ()>>(
    addr: SocketAddr,
    app: Arc<DemoApp>,
    shutdown: F,
) -> Result<(), Error> {
    let server = Server::try_bind(&addr)?.serve(make_service_fn(move |_| {
        let app = app.clone();

        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                let app = app.clone();

                async move {
                    match handle_request(request, app).await {
                        Ok(response) => Ok(response),
                        Err(err) => {
                            error!(error = %err, "couldn't handle request");
                            Ok::<Response<Body>, Infallible>(status_response(
                                StatusCode::INTERNAL_SERVER_ERROR,
                            ))
                        }
                    }
                }
            }))
        }
    }));

    info!(addr = %server.local_addr(), "server starting");
    server.with_graceful_shutdown(shutdown).await?;
    info!("server stopped");

    Ok(())
}

pub async fn handle_request(
    request: Request<Body>,
    app: Arc<DemoApp>,
) -> Result<Response<Body>, Error> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match (&method, path.as_str()) {
        (&Method::GET, "/") => {
            info!("displaying homepage");
            html_response(render::landing_page())
        }
        (&Method::GET, "/databasetest") => {
            info!("running database test");
            let log = app.run_demo().await;
            html_response(render::render(log.entries()).page.to_html())
        }
        _ => Ok(status_response(StatusCode::NOT_FOUND)),
    }
}

fn html_response<B: Into<Body>>(body: B) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(body.into())?)
}

fn status_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}
