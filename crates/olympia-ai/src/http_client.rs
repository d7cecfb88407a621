use reqwest::Client;

const DISABLE_SYSTEM_PROXY_ENV: &str = "OLYMPIA_DISABLE_SYSTEM_PROXY";

/// Build the shared HTTP client. A system proxy can buffer streamed
/// responses, defeating fragment-by-fragment delivery, so it can be bypassed
/// via env; tests always bypass it.
pub(crate) fn build_http_client() -> Client {
    let bypass_proxy =
        cfg!(test) || std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some();

    let mut builder = Client::builder();
    if bypass_proxy {
        builder = builder.no_proxy();
    }
    builder.build().expect("Failed to build reqwest client")
}
