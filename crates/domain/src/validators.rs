use crate::DomainError;

/// Lowercase and dot-terminate a hostname (`Example.COM` -> `example.com.`).
pub fn normalize_fqdn(hostname: &str) -> String {
    let trimmed = hostname.trim();
    let mut fqdn = trimmed.to_ascii_lowercase();
    if !fqdn.ends_with('.') {
        fqdn.push('.');
    }
    fqdn
}

/// Split `www.example.com.` into `example.com.` at the first separator.
///
/// Fails when the hostname has fewer than two labels, i.e. it is a TLD.
pub fn parent_domain(hostname: &str) -> Result<&str, DomainError> {
    let (_, parent) = hostname.split_once('.').ok_or_else(|| {
        DomainError::Lookup(format!("Failed to split {} to subdomains", hostname))
    })?;
    if parent.is_empty() || parent == "." {
        return Err(DomainError::Lookup(format!("{} is TLD", hostname)));
    }
    Ok(parent)
}

pub fn validate_hostname(hostname: &str) -> Result<(), DomainError> {
    let name = hostname.strip_suffix('.').unwrap_or(hostname);
    if name.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "hostname cannot be empty".to_string(),
        ));
    }
    if name.len() > 253 {
        return Err(DomainError::InvalidDomainName(format!(
            "{} exceeds 253 characters",
            hostname
        )));
    }
    if name.split('.').any(|label| label.is_empty() || label.len() > 63) {
        return Err(DomainError::InvalidDomainName(format!(
            "{} has an empty or oversized label",
            hostname
        )));
    }
    Ok(())
}
