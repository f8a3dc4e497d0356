// src/config/identity.rs

//! Resolve `--user` / `--uid` / `--gid` into a [`RunAsUser`].
//!
//! Only Unix has POSIX credentials; elsewhere the flags are ignored and a
//! setup warning says so.

use crate::errors::{Result, RunnerError};
use crate::types::RunAsUser;

#[cfg(unix)]
pub fn resolve_run_as(
    user: Option<&str>,
    uid: Option<u32>,
    gid: Option<u32>,
    warnings: &mut Vec<String>,
) -> Result<Option<RunAsUser>> {
    use nix::unistd::{Uid, User};

    if user.is_some() && (uid.is_some() || gid.is_some()) {
        return Err(RunnerError::ConfigError(
            "cannot specify both --user and --uid/--gid".to_string(),
        ));
    }

    if let Some(name) = user {
        let found = User::from_name(name)
            .map_err(|e| RunnerError::ConfigError(format!("failed to look up user {name}: {e}")))?
            .ok_or_else(|| RunnerError::ConfigError(format!("failed to look up user {name}: no such user")))?;
        return Ok(Some(RunAsUser {
            uid: Some(found.uid.as_raw()),
            gid: Some(found.gid.as_raw()),
            username: Some(name.to_string()),
            home: Some(found.dir.to_string_lossy().into_owned()),
        }));
    }

    if uid.is_none() && gid.is_none() {
        return Ok(None);
    }

    let mut run_as = RunAsUser {
        uid,
        gid,
        username: None,
        home: None,
    };

    // HOME follows the uid; a bare --gid leaves it alone.
    if let Some(uid) = uid {
        match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(found)) => {
                run_as.username = Some(found.name);
                run_as.home = Some(found.dir.to_string_lossy().into_owned());
            }
            Ok(None) => warnings.push(format!(
                "cannot find homedir for UID {uid}; HOME will not be changed"
            )),
            Err(e) => warnings.push(format!(
                "cannot find homedir for UID {uid} ({e}); HOME will not be changed"
            )),
        }
    }

    Ok(Some(run_as))
}

#[cfg(not(unix))]
pub fn resolve_run_as(
    user: Option<&str>,
    uid: Option<u32>,
    gid: Option<u32>,
    warnings: &mut Vec<String>,
) -> Result<Option<RunAsUser>> {
    if user.is_some() && (uid.is_some() || gid.is_some()) {
        return Err(RunnerError::ConfigError(
            "cannot specify both --user and --uid/--gid".to_string(),
        ));
    }
    if user.is_some() || uid.is_some() || gid.is_some() {
        warnings.push(
            "running as another user is not supported on this platform; --user/--uid/--gid ignored"
                .to_string(),
        );
    }
    Ok(None)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn no_identity_flags_means_none() {
        let mut warnings = Vec::new();
        assert!(resolve_run_as(None, None, None, &mut warnings).unwrap().is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn user_and_uid_together_is_config_error() {
        let mut warnings = Vec::new();
        let res = resolve_run_as(Some("root"), Some(0), None, &mut warnings);
        assert!(matches!(res, Err(RunnerError::ConfigError(_))));
    }

    #[test]
    fn unknown_user_is_config_error() {
        let mut warnings = Vec::new();
        let res = resolve_run_as(Some("no-such-user-for-runner-tests"), None, None, &mut warnings);
        assert!(matches!(res, Err(RunnerError::ConfigError(msg)) if msg.contains("no-such-user")));
    }

    #[test]
    fn unknown_uid_warns_and_keeps_home() {
        let mut warnings = Vec::new();
        let run_as = resolve_run_as(None, Some(3_999_999_001), None, &mut warnings)
            .unwrap()
            .unwrap();
        assert_eq!(run_as.uid, Some(3_999_999_001));
        assert!(run_as.home.is_none());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("HOME will not be changed"));
    }

    #[test]
    fn gid_only_leaves_home_untouched() {
        let mut warnings = Vec::new();
        let run_as = resolve_run_as(None, None, Some(0), &mut warnings).unwrap().unwrap();
        assert_eq!(run_as.gid, Some(0));
        assert!(run_as.uid.is_none());
        assert!(warnings.is_empty());
    }
}
