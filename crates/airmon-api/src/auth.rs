use secrecy::SecretString;

/// Username/password pair for the device's form login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// CGI endpoints exposed by the device.
///
/// Paths are relative to the device base URL and fixed by firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Form login. Primed with a GET, submitted as multipart POST.
    Login,
    /// Ends the session.
    Logout,
    /// Host and wireless gauges.
    Status,
    /// Per-interface counters.
    Interfaces,
    /// Associated stations. Served as a bare JSON array.
    Stations,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "login.cgi",
            Self::Logout => "logout.cgi",
            Self::Status => "status.cgi",
            Self::Interfaces => "iflist.cgi",
            Self::Stations => "sta.cgi",
        }
    }

    /// Page the device redirects to after a successful login.
    ///
    /// Pointing it at the JSON status endpoint is what makes a good login
    /// observable as an `application/json` response.
    pub fn login_target() -> &'static str {
        "/status.cgi"
    }
}
