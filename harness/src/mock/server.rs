use super::{
    router,
    store::{MockStore, SharedStore},
};
use crate::{
    data::{RequestData, ResponseData},
    error::Error,
    util,
};
use futures::channel::oneshot;
use hyper::{
    body,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use std::{
    convert::Infallible,
    net::{SocketAddr, TcpListener, ToSocketAddrs},
    thread::{self, JoinHandle},
};
use tokio::runtime::Runtime;
use tracing::{error, info};

/// The mock API served over HTTP from a background thread.
///
/// Each instance owns its own store, so tests can run side by side on
/// ephemeral ports. Dropping the server shuts it down.
#[derive(Debug)]
pub struct MockServer {
    address: SocketAddr,
    store: SharedStore,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl MockServer {
    /// Binds `address` (port 0 picks a free port) and starts serving an empty store.
    pub fn start<A: ToSocketAddrs>(address: A) -> Result<Self, Error> {
        Self::start_with_store(address, MockStore::new())
    }

    pub fn start_with_store<A: ToSocketAddrs>(address: A, store: MockStore) -> Result<Self, Error> {
        let listener = TcpListener::bind(address)?;
        listener.set_nonblocking(true)?;
        let address = listener.local_addr()?;

        let runtime = Runtime::new()?;
        let builder = {
            let _guard = runtime.enter();
            Server::from_tcp(listener)?
        };

        let store = store.into_shared();
        let server_store = store.clone();
        let (shutdown, shutdown_signal) = oneshot::channel::<()>();

        let join_handle = thread::spawn(move || {
            runtime.block_on(async move {
                let server = builder
                    .serve(make_service_fn(move |_| {
                        let store = server_store.clone();
                        async move {
                            Ok::<_, Infallible>(service_fn(move |req| {
                                handle_request(store.clone(), req)
                            }))
                        }
                    }))
                    .with_graceful_shutdown(async {
                        let _ = shutdown_signal.await;
                    });

                if let Err(e) = server.await {
                    error!("Mock server error: {}", e);
                }
            });
        });

        info!("Mock server listening on http://{}", address);

        Ok(Self {
            address,
            store,
            shutdown: Some(shutdown),
            join_handle: Some(join_handle),
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Handle to the state behind the server, for inspection from tests.
    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    /// Blocks until the server stops.
    pub fn wait(mut self) {
        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                error!("Mock server thread panicked");
            }
        }
    }

    pub fn shutdown(self) {
        drop(self)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                error!("Mock server thread panicked");
            }
        }
    }
}

async fn handle_request(
    store: SharedStore,
    request: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let response = match read_request_data(request).await {
        Ok(request_data) => dispatch(&store, &request_data).and_then(write_response),
        Err(e) => Err(e),
    };

    Ok(response.unwrap_or_else(|e| {
        error!("Mock server failed to handle a request: {}", e);
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    }))
}

fn dispatch(store: &SharedStore, request_data: &RequestData) -> Result<ResponseData, Error> {
    let mut store = store.lock()?;
    Ok(router::dispatch(&mut store, request_data))
}

async fn read_request_data(request: Request<Body>) -> Result<RequestData, Error> {
    let (parts, body) = request.into_parts();
    let body = body::to_bytes(body).await?;

    Ok(RequestData {
        method: parts.method.to_string(),
        uri: parts.uri.to_string(),
        headers: util::extract_headers(&parts.headers),
        body: String::from_utf8_lossy(&body).into(),
    })
}

fn write_response(response_data: ResponseData) -> Result<Response<Body>, Error> {
    let mut response_builder = Response::builder().status(response_data.status_code);

    if let Some(headers_mut) = response_builder.headers_mut() {
        util::put_headers(headers_mut, &response_data.headers)?;
    }

    Ok(response_builder.body(response_data.body.into())?)
}
