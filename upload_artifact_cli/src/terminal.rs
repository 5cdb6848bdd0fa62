//! Terminal and CI environment detection

use is_terminal::IsTerminal;
use std::env;
use std::io::{stderr, stdout};

/// Variables whose presence marks a CI runner
const CI_VARS: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "JENKINS_URL",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "TRAVIS",
    "CIRCLECI",
    "BUILDKITE",
    "DRONE",
    "TEAMCITY_VERSION",
    "TF_BUILD", // Azure DevOps
];

/// Check if running as a GitHub Actions step
pub fn is_github_actions() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

fn is_ci_environment() -> bool {
    is_ci(|var| env::var_os(var).is_some())
}

fn is_ci(is_set: impl Fn(&str) -> bool) -> bool {
    CI_VARS.iter().any(|var| is_set(var))
}

/// Colour is only used on an interactive terminal outside CI logs
fn color_allowed(is_terminal: bool) -> bool {
    if !is_terminal || is_ci_environment() {
        return false;
    }

    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    let term = env::var("TERM").unwrap_or_default();
    term != "dumb"
}

/// Check if stdout is a terminal, so human output may use colour
pub fn stdout_supports_color() -> bool {
    color_allowed(stdout().is_terminal())
}

/// Check if stderr is an interactive terminal that understands colours
pub fn stderr_supports_color() -> bool {
    color_allowed(stderr().is_terminal())
}
