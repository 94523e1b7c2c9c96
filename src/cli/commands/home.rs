//! Behaviour of a bare `milaidy` invocation.

use crate::error::Result;
use crate::ui::UserInterface;
use crate::updates::{show_update_notification, BINARY_NAME, VERSION};

use super::dispatcher::{Command, CommandResult};
use super::services::UpdateServices;

/// Prints the banner and, when allowed, the cached update notice.
pub struct HomeCommand {
    services: UpdateServices,
    notify: bool,
}

impl HomeCommand {
    /// `notify` is false when the notice is suppressed (opt-out or CI).
    pub fn new(services: UpdateServices, notify: bool) -> Self {
        Self { services, notify }
    }
}

impl Command for HomeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.message(&format!("{} {}", BINARY_NAME, VERSION));
        ui.hint(&format!("Run `{} --help` to see available commands.", BINARY_NAME));

        if self.notify {
            show_update_notification(&self.services.checker(), ui);
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::ui::MockUI;
    use crate::updates::{Deadline, DistTagSource, DistTags, ReleaseChannel};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingRegistry {
        calls: Rc<Cell<usize>>,
    }

    impl DistTagSource for CountingRegistry {
        fn fetch_dist_tags(&self, _deadline: &Deadline) -> Option<DistTags> {
            self.calls.set(self.calls.get() + 1);
            let mut tags = DistTags::new();
            tags.insert("latest".into(), "9.0.0".into());
            Some(tags)
        }
    }

    fn services(calls: &Rc<Cell<usize>>) -> UpdateServices {
        let registry = CountingRegistry {
            calls: Rc::clone(calls),
        };
        let mut services =
            UpdateServices::with_parts(Box::new(MemoryConfigStore::new()), Box::new(registry));
        services.current_version = "2.0.0".into();
        services.channel_resolver = |_| ReleaseChannel::Stable;
        services
    }

    #[test]
    fn banner_with_notice() {
        let calls = Rc::new(Cell::new(0));
        let mut ui = MockUI::new();

        HomeCommand::new(services(&calls), true)
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("milaidy "));
        assert!(ui.has_warning("Update available: 2.0.0 -> 9.0.0"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn suppressed_notice_skips_network() {
        let calls = Rc::new(Cell::new(0));
        let mut ui = MockUI::new();

        HomeCommand::new(services(&calls), false)
            .execute(&mut ui)
            .unwrap();

        assert!(ui.warnings().is_empty());
        assert_eq!(calls.get(), 0);
    }
}
