//! File-manager facing entry points
//!
//! [`BundleExtension`] is what a host calls from its callbacks: which context-menu
//! actions to show for a selection, which icon to show for a folder, and what to do
//! when the user picks "Launch Application". Nothing here returns an error to the
//! host. Failures are logged and, where the user asked for something, shown through
//! the host's [`Notifier`].

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::bundle::{BundleDescriptor, Detection, detect, is_bundle};
use crate::config::{DeclinePolicy, Settings};
use crate::error::AppBundleError;
use crate::host::{Answer, ConfirmPrompt, Notifier};
use crate::icon::IconHandle;
use crate::installer::{CancelToken, CopyProgress, Installer, LaunchedProcess};
use crate::state::{PromptLedger, PromptState};

/// Identifier of the launch action
pub const LAUNCH_ACTION_ID: &str = "AppBundleMenuProvider::Launch";

/// Heading of the install prompt
pub const INSTALL_HEADING: &str = "Install Application";

/// A context-menu action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: &'static str,
    pub label: &'static str,
    pub tip: &'static str,
}

/// The "Launch Application" action
pub const LAUNCH_ITEM: MenuItem = MenuItem {
    id: LAUNCH_ACTION_ID,
    label: "Launch Application",
    tip: "Launch this application bundle",
};

/// How a folder looks to the extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleStatus {
    /// Ordinary folder or file
    Unrecognized,
    /// Looks like a bundle but its descriptor cannot be used
    Malformed(String),
    Recognized {
        descriptor: Box<BundleDescriptor>,
        state: PromptState,
        installing: bool,
    },
}

/// What happened after "Launch Application"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The path is not a bundle; nothing was done
    NotABundle,
    /// The executable was started, from the installed copy if `installed`
    Launched {
        process: LaunchedProcess,
        installed: bool,
    },
    /// The install prompt was closed without an answer; nothing was done
    Dismissed,
    /// Something failed and the user was notified
    Failed,
}

/// Host services needed while handling a launch
pub struct Host<'a> {
    pub prompt: &'a dyn ConfirmPrompt,
    pub notifier: &'a dyn Notifier,
}

/// The extension state a host keeps for its lifetime
#[derive(Debug)]
pub struct BundleExtension {
    installer: Installer,
    ledger: PromptLedger,
    policy: DeclinePolicy,
}

impl BundleExtension {
    pub fn new(installer: Installer, ledger: PromptLedger, policy: DeclinePolicy) -> Self {
        Self {
            installer,
            ledger,
            policy,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.installer(), settings.ledger(), settings.decline_policy)
    }

    pub fn installer(&self) -> &Installer {
        &self.installer
    }

    pub fn ledger(&self) -> &PromptLedger {
        &self.ledger
    }

    /// Actions for the current selection: launch, for exactly one usable bundle
    pub fn menu_items(&self, selection: &[PathBuf]) -> Vec<MenuItem> {
        match selection {
            [single] if self.recognize(single).is_some() => vec![LAUNCH_ITEM],
            _ => Vec::new(),
        }
    }

    /// Custom icon for a folder, if it is a bundle with a usable icon
    pub fn icon_override(&self, path: &Path) -> Option<IconHandle> {
        let descriptor = self.recognize(path)?;
        let handle = self.installer.resolver().resolve(&descriptor);
        (!handle.is_generic()).then_some(handle)
    }

    /// Current status of `path`
    pub fn status(&self, path: &Path) -> BundleStatus {
        let descriptor = match detect(path) {
            Ok(Detection::Bundle(descriptor)) => descriptor,
            Ok(Detection::NotABundle) => return BundleStatus::Unrecognized,
            Err(e) => return BundleStatus::Malformed(e.to_string()),
        };
        BundleStatus::Recognized {
            state: self.prompt_state(&descriptor),
            installing: self.installer.is_installing(&descriptor),
            descriptor: Box::new(descriptor),
        }
    }

    /// Handle "Launch Application" for `path`.
    ///
    /// A bundle that is not installed and whose prompt has not been answered (or whose
    /// "no" is not remembered) first asks whether to install. "Yes" installs and launches
    /// the installed copy; "no" launches in place.
    pub fn activate_launch(
        &self,
        path: &Path,
        host: &Host<'_>,
        cancel: &CancelToken,
        progress: &mut dyn CopyProgress,
    ) -> LaunchOutcome {
        let descriptor = match detect(path) {
            Ok(Detection::Bundle(descriptor)) => descriptor,
            Ok(Detection::NotABundle) => return LaunchOutcome::NotABundle,
            Err(e) => {
                report(host, &e);
                return LaunchOutcome::Failed;
            }
        };

        let should_ask = match self.prompt_state(&descriptor) {
            PromptState::Installed => false,
            PromptState::Declined => self.policy == DeclinePolicy::Reprompt,
            PromptState::NeverAsked => true,
        };
        if !should_ask {
            return self.launch(&descriptor, host);
        }

        let body = install_prompt_body(&descriptor);
        match host.prompt.confirm(INSTALL_HEADING, &body) {
            Ok(Answer::Yes) => {
                match self.installer.install_with(&descriptor, cancel, progress) {
                    Ok(installed) => {
                        info!(bundle = %installed.bundle_path.display(), "installed");
                        if let Err(e) = self.ledger.forget(&descriptor.bundle_path) {
                            warn!(error = %e, "could not clear declined prompt");
                        }
                        self.launch(&descriptor, host)
                    }
                    Err(e) => {
                        report(host, &e);
                        LaunchOutcome::Failed
                    }
                }
            }
            Ok(Answer::No) => {
                if let Err(e) = self.ledger.record_declined(&descriptor.bundle_path) {
                    warn!(error = %e, "could not record declined prompt");
                }
                self.launch(&descriptor, host)
            }
            Ok(Answer::Dismissed) => LaunchOutcome::Dismissed,
            Err(e) => {
                report(host, &e);
                LaunchOutcome::Failed
            }
        }
    }

    fn launch(&self, descriptor: &BundleDescriptor, host: &Host<'_>) -> LaunchOutcome {
        let installed = self.installer.is_installed(descriptor);
        match self.installer.launch(descriptor) {
            Ok(process) => LaunchOutcome::Launched { process, installed },
            Err(e) => {
                report(host, &e);
                LaunchOutcome::Failed
            }
        }
    }

    /// Descriptor of a usable bundle; ordinary folders are rejected before any parsing
    fn recognize(&self, path: &Path) -> Option<BundleDescriptor> {
        if !is_bundle(path) {
            return None;
        }
        match detect(path) {
            Ok(detection) => detection.into_descriptor(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed bundle");
                None
            }
        }
    }

    fn prompt_state(&self, descriptor: &BundleDescriptor) -> PromptState {
        self.ledger
            .state(&self.installer, descriptor)
            .unwrap_or_else(|e| {
                warn!(error = %e, "prompt state unreadable, treating bundle as never asked");
                PromptState::NeverAsked
            })
    }
}

/// Body of the install prompt
pub fn install_prompt_body(descriptor: &BundleDescriptor) -> String {
    format!(
        "Do you want to install '{}'?\n\nThis will create a launcher in your applications menu.",
        descriptor.display_name
    )
}

fn report(host: &Host<'_>, err: &AppBundleError) {
    warn!(error = %err, "reported to user");
    host.notifier.notify(err.heading(), &err.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::{RecordingNotifier, ScriptedPrompt};
    use crate::icon::IconResolver;
    use crate::installer::NoProgress;
    use crate::test_fixtures::BundleFixture;
    use std::fs;

    fn extension(fixture: &BundleFixture, policy: DeclinePolicy) -> BundleExtension {
        BundleExtension::new(
            Installer::new(fixture.layout(), IconResolver::without_themes()),
            PromptLedger::new(fixture.state_file()),
            policy,
        )
    }

    fn activate(
        ext: &BundleExtension,
        path: &Path,
        prompt: &ScriptedPrompt,
        notifier: &RecordingNotifier,
    ) -> LaunchOutcome {
        let host = Host { prompt, notifier };
        ext.activate_launch(path, &host, &CancelToken::new(), &mut NoProgress)
    }

    #[test]
    fn test_menu_items_only_for_single_bundle() {
        let fixture = BundleFixture::new("Foo.app");
        let ext = extension(&fixture, DeclinePolicy::Remember);
        let plain = fixture.home().join("Downloads");

        assert_eq!(ext.menu_items(&[fixture.path.clone()]), vec![LAUNCH_ITEM]);
        assert!(ext.menu_items(&[plain.clone()]).is_empty());
        assert!(ext.menu_items(&[fixture.path.clone(), plain]).is_empty());
        assert!(ext.menu_items(&[]).is_empty());
    }

    #[test]
    fn test_malformed_bundle_gets_no_menu_item_or_icon() {
        let fixture = BundleFixture::new("Foo.app").descriptor("[Desktop Entry]\nName=x\n");
        let ext = extension(&fixture, DeclinePolicy::Remember);

        assert!(ext.menu_items(&[fixture.path.clone()]).is_empty());
        assert_eq!(ext.icon_override(&fixture.path), None);
        assert!(matches!(ext.status(&fixture.path), BundleStatus::Malformed(_)));
    }

    #[test]
    fn test_icon_override() {
        let with_icon = BundleFixture::new("Foo.app").icon("icon.png");
        let ext = extension(&with_icon, DeclinePolicy::Remember);
        assert_eq!(
            ext.icon_override(&with_icon.path),
            Some(IconHandle::File(with_icon.path.join("icon.png")))
        );

        let without_icon = BundleFixture::new("Bar.app");
        let ext = extension(&without_icon, DeclinePolicy::Remember);
        assert_eq!(ext.icon_override(&without_icon.path), None);
        assert_eq!(ext.icon_override(without_icon.home()), None);
    }

    #[test]
    fn test_status() {
        let fixture = BundleFixture::new("Foo.app");
        let ext = extension(&fixture, DeclinePolicy::Remember);

        assert_eq!(ext.status(fixture.home()), BundleStatus::Unrecognized);
        match ext.status(&fixture.path) {
            BundleStatus::Recognized {
                state, installing, ..
            } => {
                assert_eq!(state, PromptState::NeverAsked);
                assert!(!installing);
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn test_not_a_bundle_does_nothing() {
        let fixture = BundleFixture::new("Foo.app");
        let ext = extension(&fixture, DeclinePolicy::Remember);
        let prompt = ScriptedPrompt::new(Answer::Yes);
        let notifier = RecordingNotifier::default();

        let outcome = activate(&ext, fixture.home(), &prompt, &notifier);

        assert_eq!(outcome, LaunchOutcome::NotABundle);
        assert_eq!(prompt.times_asked(), 0);
        assert!(notifier.headings().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_yes_installs_then_launches_installed_copy() {
        let fixture = BundleFixture::new("Foo.app").name("Foo");
        let ext = extension(&fixture, DeclinePolicy::Remember);
        let prompt = ScriptedPrompt::new(Answer::Yes);
        let notifier = RecordingNotifier::default();

        let outcome = activate(&ext, &fixture.path, &prompt, &notifier);

        let installed_exec = fixture.home().join("Applications/Foo.app/AppRun");
        match outcome {
            LaunchOutcome::Launched { process, installed } => {
                assert!(installed);
                assert_eq!(process.executable, installed_exec);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        // Installed bundles are not prompted again
        activate(&ext, &fixture.path, &prompt, &notifier);
        assert_eq!(prompt.times_asked(), 1);
        assert!(notifier.headings().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_no_launches_in_place_and_is_remembered() {
        let fixture = BundleFixture::new("Foo.app").name("Foo");
        let ext = extension(&fixture, DeclinePolicy::Remember);
        let prompt = ScriptedPrompt::new(Answer::No);
        let notifier = RecordingNotifier::default();

        let outcome = activate(&ext, &fixture.path, &prompt, &notifier);
        match outcome {
            LaunchOutcome::Launched { process, installed } => {
                assert!(!installed);
                assert_eq!(process.executable, fixture.path.join("AppRun"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        activate(&ext, &fixture.path, &prompt, &notifier);
        assert_eq!(prompt.times_asked(), 1);
        let descriptor = detect(&fixture.path).unwrap().into_descriptor().unwrap();
        assert!(!ext.installer().is_installed(&descriptor));
        assert!(ext.ledger().is_declined(&fixture.path).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_reprompt_policy_asks_again() {
        let fixture = BundleFixture::new("Foo.app");
        let ext = extension(&fixture, DeclinePolicy::Reprompt);
        let prompt = ScriptedPrompt::new(Answer::No);
        let notifier = RecordingNotifier::default();

        activate(&ext, &fixture.path, &prompt, &notifier);
        activate(&ext, &fixture.path, &prompt, &notifier);

        assert_eq!(prompt.times_asked(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_bundle_sharing_a_name_is_not_treated_as_installed() {
        let fixture = BundleFixture::new("Foo-1.0.app").name("Foo");
        let other = fixture.sibling("Foo-2.0.app", "Name=Foo\nExec=AppRun2\n");
        let ext = extension(&fixture, DeclinePolicy::Remember);
        let yes = ScriptedPrompt::new(Answer::Yes);
        let notifier = RecordingNotifier::default();

        activate(&ext, &fixture.path, &yes, &notifier);
        match ext.status(&other) {
            BundleStatus::Recognized { state, .. } => assert_eq!(state, PromptState::NeverAsked),
            status => panic!("unexpected status {status:?}"),
        }

        // Installing over the other bundle's copy is refused
        let outcome = activate(&ext, &other, &yes, &notifier);
        assert_eq!(outcome, LaunchOutcome::Failed);
        assert_eq!(yes.times_asked(), 2);
        assert_eq!(notifier.headings(), vec!["Installation Error".to_string()]);

        // Declining runs it from where it is
        let no = ScriptedPrompt::new(Answer::No);
        match activate(&ext, &other, &no, &notifier) {
            LaunchOutcome::Launched { process, installed } => {
                assert!(!installed);
                assert_eq!(process.executable, other.join("AppRun2"));
            }
            outcome => panic!("unexpected outcome {outcome:?}"),
        }
    }

    #[test]
    fn test_dismissed_prompt_changes_nothing() {
        let fixture = BundleFixture::new("Foo.app");
        let ext = extension(&fixture, DeclinePolicy::Remember);
        let prompt = ScriptedPrompt::new(Answer::Dismissed);
        let notifier = RecordingNotifier::default();

        let outcome = activate(&ext, &fixture.path, &prompt, &notifier);

        assert_eq!(outcome, LaunchOutcome::Dismissed);
        assert!(!fixture.state_file().exists());
        assert!(!fixture.layout().applications_dir.exists());
    }

    #[test]
    fn test_launch_failure_is_notified() {
        let fixture = BundleFixture::new("Foo.app");
        fs::remove_file(fixture.path.join("AppRun")).unwrap();
        let ext = extension(&fixture, DeclinePolicy::Remember);
        let prompt = ScriptedPrompt::new(Answer::No);
        let notifier = RecordingNotifier::default();

        let outcome = activate(&ext, &fixture.path, &prompt, &notifier);

        assert_eq!(outcome, LaunchOutcome::Failed);
        assert_eq!(notifier.headings(), vec!["Launch Error".to_string()]);
    }

    #[test]
    fn test_malformed_descriptor_is_notified() {
        let fixture = BundleFixture::new("Foo.app").descriptor("garbage without equals\n");
        let ext = extension(&fixture, DeclinePolicy::Remember);
        let prompt = ScriptedPrompt::new(Answer::Yes);
        let notifier = RecordingNotifier::default();

        let outcome = activate(&ext, &fixture.path, &prompt, &notifier);

        assert_eq!(outcome, LaunchOutcome::Failed);
        assert_eq!(prompt.times_asked(), 0);
        assert_eq!(notifier.headings(), vec!["Bundle Error".to_string()]);
    }

    #[test]
    fn test_failed_install_can_be_retried() {
        let fixture = BundleFixture::new("Foo.app").name("Foo");
        let ext = extension(&fixture, DeclinePolicy::Remember);
        let prompt = ScriptedPrompt::new(Answer::Yes);
        let notifier = RecordingNotifier::default();
        let entries_dir = fixture.layout().entries_dir;
        fs::create_dir_all(entries_dir.parent().unwrap()).unwrap();
        fs::write(&entries_dir, "blocks the entries directory").unwrap();

        let outcome = activate(&ext, &fixture.path, &prompt, &notifier);

        assert_eq!(outcome, LaunchOutcome::Failed);
        assert_eq!(notifier.headings(), vec!["Installation Error".to_string()]);
        match ext.status(&fixture.path) {
            BundleStatus::Recognized { state, .. } => assert_eq!(state, PromptState::NeverAsked),
            other => panic!("unexpected status {other:?}"),
        }
    }
}
