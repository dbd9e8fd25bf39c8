#![allow(dead_code)]

// * In-process front end emulating the mobile/standard routing rules:
// * - `p$mobile=true` marks the request as coming from a mobile device
// * - a `ncbi_mmode=std` cookie keeps the standard site
// * - a `ncbi_mmode=std` query flag switches back to standard and stores the cookie
// * - anything under /m/ is the mobile site and is always served
// * Plus a few diagnostic routes (/loop, /chain, /nolocation, /utf8, /badlocation).

use hyper::header::{HeaderValue, COOKIE, HOST, LOCATION, SET_COOKIE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use mmode_probe::config::constants::{MODE_COOKIE, MODE_FLAG_PARAM, TEST_CONTROL_PARAM};
use mmode_probe::network::cookies::SiteMode;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::sync::oneshot;
use url::form_urlencoded;

pub struct FixtureServer {
    pub base_url: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn start() -> FixtureServer {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));

    let make_svc = make_service_fn(|_conn| async {
        Ok::<_, Infallible>(service_fn(handle))
    });

    let server = Server::bind(&addr).serve(make_svc);
    let local = server.local_addr();

    tokio::spawn(server.with_graceful_shutdown(async {
        let _ = shutdown_rx.await;
    }));

    FixtureServer {
        base_url: format!("http://{}/", local),
        shutdown_tx: Some(shutdown_tx),
    }
}

// * Accepts connections and never answers.
pub async fn start_silent() -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    (format!("http://{}/", addr), handle)
}

// * An address nothing listens on.
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

async fn handle(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let origin = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_default();
    let cookie = req
        .headers()
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let path = req.uri().path().to_string();
    let pairs: Vec<(String, String)> = req
        .uri()
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    Ok(route(&origin, &path, &pairs, cookie.as_deref()))
}

fn route(
    origin: &str,
    path: &str,
    pairs: &[(String, String)],
    cookie: Option<&str>,
) -> Response<Body> {
    match path {
        "/loop" => return redirect(StatusCode::FOUND, "/loop"),
        "/chain" => return redirect(StatusCode::FOUND, "/echo"),
        "/echo" => {
            let seen = encode(&[("cookie".to_string(), cookie.unwrap_or("none").to_string())]);
            return redirect(StatusCode::SEE_OTHER, &format!("/seen?{}", seen));
        }
        "/nolocation" => return status(StatusCode::FOUND),
        // * Unencoded UTF-8 in the header, as some servers send it
        "/utf8" => return redirect_raw(StatusCode::SEE_OTHER, "/seen?term=café".as_bytes()),
        "/badlocation" => return redirect_raw(StatusCode::SEE_OTHER, b"/seen?term=caf\xe9"),
        _ => {}
    }

    if path.starts_with("/m/") || path == "/seen" {
        return status(StatusCode::OK);
    }
    if path != "/pubmed" && !path.starts_with("/pubmed/") {
        return status(StatusCode::NOT_FOUND);
    }

    let emulate_mobile = pairs
        .iter()
        .any(|(k, v)| k == TEST_CONTROL_PARAM && v == "true");
    if !emulate_mobile {
        return status(StatusCode::OK);
    }

    let cookie_mode = cookie_value(cookie, MODE_COOKIE)
        .as_deref()
        .and_then(SiteMode::from_cookie_value);
    let flag = pairs
        .iter()
        .find(|(k, _)| k == MODE_FLAG_PARAM)
        .and_then(|(_, v)| SiteMode::from_cookie_value(v));

    if flag == Some(SiteMode::Standard) {
        if cookie_mode == Some(SiteMode::Standard) {
            return status(StatusCode::OK);
        }
        let rest: Vec<(String, String)> = pairs
            .iter()
            .filter(|(k, _)| k != MODE_FLAG_PARAM)
            .cloned()
            .collect();
        let location = if rest.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, encode(&rest))
        };
        let mut resp = redirect(StatusCode::SEE_OTHER, &location);
        resp.headers_mut()
            .insert(SET_COOKIE, "ncbi_mmode=std; Path=/".parse().unwrap());
        return resp;
    }

    if cookie_mode == Some(SiteMode::Standard) {
        return status(StatusCode::OK);
    }

    let target = mobile_target(path, pairs);
    redirect(StatusCode::SEE_OTHER, &format!("{}{}", origin, target))
}

// * Standard URL -> mobile URL, keeping the test parameter on the way.
fn mobile_target(path: &str, pairs: &[(String, String)]) -> String {
    let find = |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());
    let id = path.trim_start_matches("/pubmed").trim_matches('/');

    let mut query = Vec::new();
    let target_path = if !id.is_empty() {
        format!("/m/pubmed/{}/", id)
    } else if let (Some("link"), Some(uid)) = (find("cmd").as_deref(), find("uid")) {
        format!("/m/pubmed/{}/related/", uid)
    } else {
        if let Some(term) = find("term") {
            query.push(("term".to_string(), term));
        }
        "/m/pubmed/".to_string()
    };
    query.push((TEST_CONTROL_PARAM.to_string(), "true".to_string()));

    format!("{}?{}", target_path, encode(&query))
}

fn cookie_value(header: Option<&str>, name: &str) -> Option<String> {
    header?
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

fn encode(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish()
}

fn redirect(code: StatusCode, location: &str) -> Response<Body> {
    Response::builder()
        .status(code)
        .header(LOCATION, location)
        .body(Body::empty())
        .unwrap()
}

fn redirect_raw(code: StatusCode, location: &[u8]) -> Response<Body> {
    Response::builder()
        .status(code)
        .header(LOCATION, HeaderValue::from_bytes(location).unwrap())
        .body(Body::empty())
        .unwrap()
}

fn status(code: StatusCode) -> Response<Body> {
    Response::builder().status(code).body(Body::empty()).unwrap()
}
