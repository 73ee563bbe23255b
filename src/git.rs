use std::path::Path;
use std::process::Command;

use url::Url;

use crate::error::Error;
use crate::filesystem;

/// Username and app password for HTTPS clones.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Environment variables the inline credential helper reads.
const USERNAME_ENV: &str = "VERSIONS_AGGREGATE_GIT_USERNAME";
const PASSWORD_ENV: &str = "VERSIONS_AGGREGATE_GIT_PASSWORD";

/// Answers git's `get` request from the environment, so the secret never
/// appears in a process argument list.
const CREDENTIAL_HELPER: &str = "credential.helper=!f() { test \"$1\" = get && \
     printf 'username=%s\\npassword=%s\\n' \
     \"$VERSIONS_AGGREGATE_GIT_USERNAME\" \"$VERSIONS_AGGREGATE_GIT_PASSWORD\"; }; f";

/// Clone a single branch of a repository using a shallow clone
///
/// This uses the system git command. Without explicit credentials, whatever
/// the user's git setup provides applies (SSH keys, credential helpers,
/// tokens in ~/.gitconfig). With credentials, git is given a one-off
/// credential helper fed through the child's environment; the URL stays
/// plain and the password is scrubbed from any error reported back.
pub fn clone_branch(
    url: &str,
    branch: &str,
    credentials: Option<&Credentials>,
    target_dir: &Path,
) -> Result<(), Error> {
    let display_url = redact(url);
    let mut command = clone_command(url, branch, credentials, target_dir)?;

    // git refuses to clone into a non-empty directory
    if target_dir.exists() {
        std::fs::remove_dir_all(target_dir).map_err(|e| Error::fs("delete directory", target_dir, e))?;
    }
    if let Some(parent) = target_dir.parent() {
        filesystem::ensure_dir(parent)?;
    }

    log::info!("Cloning {}@{}", display_url, branch);
    let output = command.output().map_err(|e| Error::GitClone {
        url: display_url.clone(),
        r#ref: branch.to_string(),
        message: e.to_string(),
        hint: Some("Is git installed and on PATH?".to_string()),
    })?;

    if !output.status.success() {
        let stderr = scrub(&String::from_utf8_lossy(&output.stderr), url, credentials);

        let hint = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("could not read Username")
            || stderr.contains("Could not read from remote repository")
        {
            Some(
                "Check the username and app password, or the SSH key / credential helper \
                 configured for this host"
                    .to_string(),
            )
        } else if stderr.contains("Remote branch") && stderr.contains("not found") {
            Some(format!("Branch '{}' does not exist on the remote", branch))
        } else {
            None
        };

        return Err(Error::GitClone {
            url: display_url,
            r#ref: branch.to_string(),
            message: stderr.trim().to_string(),
            hint,
        });
    }

    Ok(())
}

fn clone_command(
    url: &str,
    branch: &str,
    credentials: Option<&Credentials>,
    target_dir: &Path,
) -> Result<Command, Error> {
    let mut command = Command::new("git");
    command.env("GIT_TERMINAL_PROMPT", "0");

    if let Some(creds) = credentials {
        require_http(url)?;
        // The empty helper resets any helpers from the user's config
        command
            .args(["-c", "credential.helper=", "-c", CREDENTIAL_HELPER])
            .env(USERNAME_ENV, &creds.username)
            .env(PASSWORD_ENV, &creds.password);
    }

    command
        .args(["clone", "--depth=1", "--single-branch", "--branch", branch])
        .arg(url)
        .arg(target_dir);
    Ok(command)
}

/// Credentials are only sent over http(s).
fn require_http(url: &str) -> Result<(), Error> {
    let parsed = Url::parse(url)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::GitClone {
            url: redact(url),
            r#ref: String::new(),
            message: "credentials can only be used with http(s) URLs".to_string(),
            hint: Some("Drop --username/--password to use SSH authentication".to_string()),
        });
    }
    Ok(())
}

/// Replace any password embedded in `url` with `***`.
pub fn redact(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        _ => url.to_string(),
    }
}

/// Remove the secrets git may echo back: the raw password, its
/// percent-encoded URL form, and any password the user embedded in `url`.
fn scrub(text: &str, url: &str, credentials: Option<&Credentials>) -> String {
    let mut secrets: Vec<String> = Vec::new();
    if let Some(creds) = credentials {
        secrets.push(creds.password.clone());
        secrets.extend(url_encoded(&creds.password));
    }
    if let Some(embedded) = Url::parse(url).ok().and_then(|u| u.password().map(str::to_string)) {
        secrets.push(embedded);
    }

    // Longest first, so a secret is never partly replaced by a shorter one
    secrets.retain(|s| !s.is_empty());
    secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
    secrets
        .iter()
        .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), "***"))
}

/// The password as it appears in a URL's userinfo.
fn url_encoded(password: &str) -> Option<String> {
    let mut carrier = Url::parse("https://user@localhost/").ok()?;
    carrier.set_password(Some(password)).ok()?;
    carrier.password().map(str::to_string)
}
