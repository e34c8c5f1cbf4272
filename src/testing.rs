//! In-process HTTP fakes for the bridge, its description document and the
//! lookup service.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::{Method, Uri};
use tokio::net::TcpListener;

/// A request as seen by a [`FakeServer`].
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub(crate) struct FakeServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeServer {
    /// Serves whatever `respond` returns for each method and path.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&Method, &str) -> String + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let respond = Arc::new(respond);

        let log = requests.clone();
        let router = Router::new().fallback(move |method: Method, uri: Uri, body: String| {
            let log = log.clone();
            let respond = respond.clone();
            async move {
                let reply = respond(&method, uri.path());
                log.lock().unwrap().push(Recorded {
                    method,
                    path: uri.path().to_string(),
                    body,
                });
                reply
            }
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        FakeServer {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Serves the same body for every request.
    pub async fn with_body(body: &str) -> Self {
        let body = body.to_string();
        Self::start(move |_, _| body.clone()).await
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().unwrap()
    }
}
