use url::Url;

/// The address of a loaded page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLocation {
    /// Serialized URL (`location.href`).
    href: String,
    /// Host name (`location.hostname`); empty for host-less URLs.
    hostname: String,
}

impl PageLocation {
    /// Parse an absolute URL.
    pub fn parse(href: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(href)?;
        Ok(Self {
            hostname: url.host_str().unwrap_or_default().to_string(),
            href: url.into(),
        })
    }

    /// The full URL.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// The host name, used as a binding's primary scope.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}
