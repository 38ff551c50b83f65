//! Classify curl errors into retryable transport errors or permanent request errors.

use crate::error::{AttemptError, TransportError};

/// Map a curl error to the attempt error the executor acts on.
///
/// DNS, connect, TLS, timeout and send/receive failures are transport errors
/// (retried). A malformed URL or unsupported scheme can never succeed and is
/// reported as an invalid request. Anything else is treated as transient.
pub fn classify_curl_error(e: &curl::Error) -> AttemptError {
    let msg = e.to_string();
    if e.is_url_malformed() || e.is_unsupported_protocol() || e.is_bad_function_argument() {
        return AttemptError::InvalidRequest(msg);
    }
    let transport = if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        TransportError::Resolve(msg)
    } else if e.is_couldnt_connect() {
        TransportError::Connect(msg)
    } else if e.is_operation_timedout() {
        TransportError::Timeout(msg)
    } else if e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_ssl_certproblem()
        || e.is_ssl_cipher()
        || e.is_ssl_cacert_badfile()
    {
        TransportError::Tls(msg)
    } else if e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        TransportError::Io(msg)
    } else {
        TransportError::Other(msg)
    };
    AttemptError::Transport(transport)
}
