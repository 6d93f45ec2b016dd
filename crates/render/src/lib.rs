#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Renderer for the managed APT configuration files
//!
//! A family of pure functions, one per config line, each mapping the desired
//! state to the exact line of text that should appear in a target file.
//! `plan` composes them and merges all fragments destined for the same file
//! into a single content string, so the dispatcher performs exactly one
//! write per file per convergence pass.
//!
//! Values are rendered verbatim: integers as decimal, booleans as their
//! canonical `true`/`false` tokens, strings without escaping. The
//! `${distro_id}`/`${distro_codename}` placeholders are expanded by APT at
//! runtime, not by us.

use upkeep_types::{DesiredState, TargetFile};

/// One logical line of a target file, derived from one piece of desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub file: TargetFile,
    pub line: String,
}

impl Fragment {
    fn new(file: TargetFile, line: String) -> Self {
        Self { file, line }
    }
}

/// The full desired text of one target file: all of its fragments merged,
/// newline-joined, with a trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    pub file: TargetFile,
    pub content: String,
}

/// Allowed-origins line for one upgrade type.
#[must_use]
pub fn origin_line(upgrade_type: &str) -> String {
    format!("\"${{distro_id}}:${{distro_codename}}-{upgrade_type}\";")
}

/// Upgrade report mail recipient.
#[must_use]
pub fn mail_line(state: &DesiredState) -> String {
    format!("Unattended-Upgrade::Mail \"{}\";", state.mail_recipient)
}

/// Automatic reboot policy.
#[must_use]
pub fn auto_reboot_line(state: &DesiredState) -> String {
    format!(
        "Unattended-Upgrade::Automatic-Reboot \"{}\";",
        state.auto_reboot
    )
}

/// Unused dependency removal policy.
#[must_use]
pub fn remove_unused_dependencies_line(state: &DesiredState) -> String {
    format!(
        "Unattended-Upgrade::Remove-Unused-Dependencies \"{}\";",
        state.remove_unused_dependencies
    )
}

/// Package blacklist block; `None` when no blacklist is configured.
///
/// The configured string is split on commas and whitespace, one quoted
/// pattern per entry, rendered as a single-line block.
#[must_use]
pub fn package_blacklist_block(state: &DesiredState) -> Option<String> {
    let raw = state.package_blacklist.as_deref()?;
    let patterns: Vec<&str> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return None;
    }

    let mut block = String::from("Unattended-Upgrade::Package-Blacklist {");
    for pattern in patterns {
        block.push_str(" \"");
        block.push_str(pattern);
        block.push_str("\";");
    }
    block.push_str(" };");
    Some(block)
}

/// Package list update frequency.
#[must_use]
pub fn update_package_lists_line(state: &DesiredState) -> String {
    format!(
        "APT::Periodic::Update-Package-Lists \"{}\";",
        state.update_package_lists_days
    )
}

/// Unattended upgrade frequency.
#[must_use]
pub fn unattended_upgrade_line(state: &DesiredState) -> String {
    format!(
        "APT::Periodic::Unattended-Upgrade \"{}\";",
        state.unattended_upgrade_days
    )
}

/// Upgradeable package download frequency.
#[must_use]
pub fn download_upgradeable_line(state: &DesiredState) -> String {
    format!(
        "APT::Periodic::Download-Upgradeable-Packages \"{}\";",
        state.download_upgradeable_days
    )
}

/// Autoclean interval.
#[must_use]
pub fn autoclean_interval_line(state: &DesiredState) -> String {
    format!(
        "APT::Periodic::AutocleanInterval \"{}\";",
        state.autoclean_interval_days
    )
}

/// All fragments the desired state implies, in file order then line order.
#[must_use]
pub fn fragments(state: &DesiredState) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for upgrade_type in &state.upgrade_types {
        fragments.push(Fragment::new(
            TargetFile::AllowedOrigins,
            origin_line(upgrade_type),
        ));
    }
    fragments.push(Fragment::new(TargetFile::AllowedOrigins, mail_line(state)));
    fragments.push(Fragment::new(
        TargetFile::AllowedOrigins,
        auto_reboot_line(state),
    ));
    fragments.push(Fragment::new(
        TargetFile::AllowedOrigins,
        remove_unused_dependencies_line(state),
    ));
    if let Some(blacklist) = package_blacklist_block(state) {
        fragments.push(Fragment::new(TargetFile::AllowedOrigins, blacklist));
    }

    fragments.push(Fragment::new(
        TargetFile::PeriodicSchedule,
        update_package_lists_line(state),
    ));
    fragments.push(Fragment::new(
        TargetFile::PeriodicSchedule,
        unattended_upgrade_line(state),
    ));
    fragments.push(Fragment::new(
        TargetFile::PeriodicSchedule,
        download_upgradeable_line(state),
    ));
    fragments.push(Fragment::new(
        TargetFile::PeriodicSchedule,
        autoclean_interval_line(state),
    ));

    fragments
}

/// Merge all fragments per target file into one write-ready plan per file.
#[must_use]
pub fn plan(state: &DesiredState) -> Vec<FilePlan> {
    let all = fragments(state);
    TargetFile::ALL
        .into_iter()
        .map(|file| {
            let mut content = String::new();
            for fragment in all.iter().filter(|f| f.file == file) {
                content.push_str(&fragment.line);
                content.push('\n');
            }
            FilePlan { file, content }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_state() -> DesiredState {
        DesiredState::builder()
            .with_upgrade_types(vec!["security".into(), "updates".into()])
            .with_mail_recipient("ops@x.com")
            .with_auto_reboot(true)
            .with_update_package_lists_days(1)
            .with_unattended_upgrade_days(1)
            .with_download_upgradeable_days(0)
            .with_autoclean_interval_days(7)
            .build()
            .unwrap()
    }

    #[test]
    fn rendering_is_deterministic() {
        let state = scenario_state();
        assert_eq!(plan(&state), plan(&state));
    }

    #[test]
    fn periodic_file_is_exactly_four_lines() {
        let state = scenario_state();
        let plans = plan(&state);
        let periodic = plans
            .iter()
            .find(|p| p.file == TargetFile::PeriodicSchedule)
            .unwrap();

        assert_eq!(
            periodic.content,
            "APT::Periodic::Update-Package-Lists \"1\";\n\
             APT::Periodic::Unattended-Upgrade \"1\";\n\
             APT::Periodic::Download-Upgradeable-Packages \"0\";\n\
             APT::Periodic::AutocleanInterval \"7\";\n"
        );
        assert_eq!(periodic.content.lines().count(), 4);
    }

    #[test]
    fn origins_file_has_one_quoted_origin_per_type() {
        let state = scenario_state();
        let plans = plan(&state);
        let origins = plans
            .iter()
            .find(|p| p.file == TargetFile::AllowedOrigins)
            .unwrap();

        let lines: Vec<&str> = origins.content.lines().collect();
        assert_eq!(lines[0], "\"${distro_id}:${distro_codename}-security\";");
        assert_eq!(lines[1], "\"${distro_id}:${distro_codename}-updates\";");
        assert_eq!(lines[2], "Unattended-Upgrade::Mail \"ops@x.com\";");
        assert_eq!(lines[3], "Unattended-Upgrade::Automatic-Reboot \"true\";");
    }

    #[test]
    fn defaults_render_and_are_written_like_any_value() {
        let state = DesiredState::default();
        let plans = plan(&state);

        let origins = &plans[0];
        assert!(origins
            .content
            .contains("\"${distro_id}:${distro_codename}-security\";"));
        assert!(origins.content.contains("Unattended-Upgrade::Mail \"root\";"));
        assert!(origins
            .content
            .contains("Unattended-Upgrade::Automatic-Reboot \"false\";"));
        assert!(origins
            .content
            .contains("Unattended-Upgrade::Remove-Unused-Dependencies \"false\";"));

        let periodic = &plans[1];
        assert!(periodic
            .content
            .contains("APT::Periodic::Update-Package-Lists \"0\";"));
        assert!(periodic
            .content
            .contains("APT::Periodic::Unattended-Upgrade \"1\";"));
    }

    #[test]
    fn blacklist_splits_into_quoted_patterns() {
        let state = DesiredState::builder()
            .with_package_blacklist(Some("libc6, kernel* vim".into()))
            .build()
            .unwrap();

        let block = package_blacklist_block(&state).unwrap();
        assert_eq!(
            block,
            "Unattended-Upgrade::Package-Blacklist { \"libc6\"; \"kernel*\"; \"vim\"; };"
        );
    }

    #[test]
    fn absent_or_blank_blacklist_renders_nothing() {
        let state = DesiredState::default();
        assert!(package_blacklist_block(&state).is_none());

        let state = DesiredState::builder()
            .with_package_blacklist(Some("   ".into()))
            .build()
            .unwrap();
        assert!(package_blacklist_block(&state).is_none());
        assert!(!plan(&state)[0].content.contains("Package-Blacklist"));
    }

    #[test]
    fn plan_covers_both_files_in_converge_order() {
        let plans = plan(&DesiredState::default());
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].file, TargetFile::AllowedOrigins);
        assert_eq!(plans[1].file, TargetFile::PeriodicSchedule);
        for file_plan in &plans {
            assert!(file_plan.content.ends_with('\n'));
        }
    }
}
