use std::time::Duration;

pub(super) fn default_update_command() -> String {
    "/usr/bin/checkupdates".to_string()
}

pub(super) fn default_aur_command() -> String {
    "/usr/bin/auracle sync".to_string()
}

pub(super) const fn default_max_lines() -> usize {
    30
}

pub(super) fn default_appname() -> String {
    "New Updates".to_string()
}

pub(super) fn default_category() -> String {
    "update".to_string()
}

pub(super) fn default_urgency() -> String {
    "normal".to_string()
}

pub(super) const fn default_timeout() -> Duration {
    Duration::from_secs(3600)
}

pub(super) const fn default_loop_interval() -> Duration {
    Duration::from_secs(3600)
}
