/// HTTP server configuration constants.
///
/// The bind address is fixed; the port can be overridden at startup with the
/// `PORT` environment variable.
pub const HOST: &str = "127.0.0.1";

/// Default port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3001;
