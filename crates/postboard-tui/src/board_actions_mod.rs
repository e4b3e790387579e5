//! Board handlers. Every handler runs the same sequence: mutate the store,
//! persist it, then apply the render delta. A failed save is reported only
//! after the delta is applied, so the rendered list always matches the
//! store even when the disk write did not go through.

use anyhow::Result;
use postboard_core::{
    KeyValueSlot, MessagePersistence, MessageStore, Validation, log_debug, validate,
};

use crate::detail_mod::DetailViewer;
use crate::intake_mod::IntakeForm;
use crate::list_render_mod::ListRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubmitOutcome {
    Rejected(Validation),
    Saved(u64),
}

/// Validates the form. Invalid input only shows inline errors; the form
/// keeps its contents and nothing else changes.
pub(crate) fn submit_form<S: KeyValueSlot>(
    form: &mut IntakeForm,
    store: &mut MessageStore,
    persistence: &mut MessagePersistence<S>,
    list: &mut ListRenderer,
) -> Result<SubmitOutcome> {
    let (name, email, message) = form.trimmed();
    let validation = validate(&name, &email, &message);
    if !validation.is_valid() {
        form.show_errors(validation);
        log_debug(&format!(
            "intake rejected fields={:?}",
            validation.errors().iter().map(|(f, _)| *f).collect::<Vec<_>>()
        ));
        return Ok(SubmitOutcome::Rejected(validation));
    }

    let id = store.insert(&name, &email, &message);
    let saved = persistence.save(store);
    if let Some(record) = store.get(id) {
        list.append(record);
        list.select_id(id);
    }
    form.reset();
    log_debug(&format!("intake saved id={}", id));
    saved.map(|_| SubmitOutcome::Saved(id))
}

pub(crate) fn toggle_read<S: KeyValueSlot>(
    id: u64,
    store: &mut MessageStore,
    persistence: &mut MessagePersistence<S>,
    list: &mut ListRenderer,
) -> Result<()> {
    if !store.toggle_read(id) {
        return Ok(());
    }
    let saved = persistence.save(store);
    let read = store.get(id).map(|r| r.read).unwrap_or(false);
    list.set_read(id, read);
    log_debug(&format!("toggle id={} read={}", id, read));
    saved
}

pub(crate) fn delete_message<S: KeyValueSlot>(
    id: u64,
    store: &mut MessageStore,
    persistence: &mut MessagePersistence<S>,
    list: &mut ListRenderer,
) -> Result<()> {
    if !store.delete(id) {
        return Ok(());
    }
    let saved = persistence.save(store);
    list.remove(id);
    log_debug(&format!("delete id={} remaining={}", id, store.len()));
    saved
}

/// Opens the detail view and marks the message read, even if it already was.
pub(crate) fn open_message<S: KeyValueSlot>(
    id: u64,
    store: &mut MessageStore,
    persistence: &mut MessagePersistence<S>,
    list: &mut ListRenderer,
    detail: &mut DetailViewer,
) -> Result<()> {
    let Some(record) = store.get(id) else {
        return Ok(());
    };
    detail.open(record);
    store.mark_read(id);
    let saved = persistence.save(store);
    list.set_read(id, true);
    list.select_id(id);
    saved
}

pub(crate) fn close_detail(detail: &mut DetailViewer) {
    detail.close();
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow};
    use postboard_core::{
        Field, FieldError, KeyValueSlot, MemorySlot, MessagePersistence, MessageStore,
    };

    use super::{SubmitOutcome, close_detail, delete_message, open_message, submit_form, toggle_read};
    use crate::detail_mod::DetailViewer;
    use crate::intake_mod::IntakeForm;
    use crate::list_render_mod::ListRenderer;

    /// A slot that refuses writes, for checking that the list stays in sync.
    struct ReadOnlySlot;

    impl KeyValueSlot for ReadOnlySlot {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("read-only"))
        }
    }

    struct Board<S> {
        form: IntakeForm,
        store: MessageStore,
        persistence: MessagePersistence<S>,
        list: ListRenderer,
        detail: DetailViewer,
    }

    impl<S: KeyValueSlot> Board<S> {
        fn new(slot: S) -> Self {
            let persistence = MessagePersistence::new(slot);
            let store = persistence.hydrate();
            let mut list = ListRenderer::new(40);
            list.rebuild(&store.all());
            Self {
                form: IntakeForm::new(),
                store,
                persistence,
                list,
                detail: DetailViewer::new(),
            }
        }

        fn fill(&mut self, name: &str, email: &str, message: &str) {
            self.form.set_value(Field::Name, name);
            self.form.set_value(Field::Email, email);
            self.form.set_value(Field::Message, message);
        }

        fn submit(&mut self) -> Result<SubmitOutcome> {
            submit_form(
                &mut self.form,
                &mut self.store,
                &mut self.persistence,
                &mut self.list,
            )
        }

        fn toggle(&mut self, id: u64) -> Result<()> {
            toggle_read(id, &mut self.store, &mut self.persistence, &mut self.list)
        }

        fn delete(&mut self, id: u64) -> Result<()> {
            delete_message(id, &mut self.store, &mut self.persistence, &mut self.list)
        }

        fn open(&mut self, id: u64) -> Result<()> {
            open_message(
                id,
                &mut self.store,
                &mut self.persistence,
                &mut self.list,
                &mut self.detail,
            )
        }

        fn persisted(&self) -> MessageStore {
            self.persistence.hydrate()
        }

        fn assert_in_sync(&self) {
            assert_eq!(self.list.card_ids(), self.store.ids());
            for card in self.list.cards() {
                assert_eq!(self.store.get(card.id).map(|r| r.read), Some(card.read));
            }
        }
    }

    #[test]
    fn contact_board_scenario() -> Result<()> {
        let mut board = Board::new(MemorySlot::new());
        assert!(board.list.is_placeholder());

        board.fill("", "a@b.com", "hi");
        let outcome = board.submit()?;
        let SubmitOutcome::Rejected(validation) = outcome else {
            return Err(anyhow!("expected rejection, got {:?}", outcome));
        };
        assert_eq!(validation.errors(), vec![(Field::Name, FieldError::MissingField)]);
        assert_eq!(board.form.error_line(Field::Name), Some("Name is required."));
        assert_eq!(board.form.error_line(Field::Email), None);
        assert_eq!(board.form.value(Field::Email), "a@b.com");
        assert!(board.store.is_empty());

        board.fill("Ann", "bad-email", "hi");
        let outcome = board.submit()?;
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(postboard_core::validate("Ann", "bad-email", "hi"))
        );
        assert_eq!(board.form.error_line(Field::Email), Some("Email is not valid."));
        assert_eq!(board.form.error_line(Field::Name), None);
        assert!(board.store.is_empty());
        assert!(board.persisted().is_empty());

        board.fill("Ann", "a@b.com", "hi");
        assert_eq!(board.submit()?, SubmitOutcome::Saved(1));
        let record = board.store.get(1).ok_or_else(|| anyhow!("missing record"))?;
        assert!(!record.read);
        assert_eq!(board.list.card_ids(), vec![1]);
        assert_eq!(board.list.cards()[0].toggle_label(), "mark as read");
        assert_eq!(board.persisted().len(), 1);
        assert_eq!(board.form.value(Field::Name), "");
        assert_eq!(board.form.value(Field::Message), "");

        board.toggle(1)?;
        assert_eq!(board.store.get(1).map(|r| r.read), Some(true));
        assert_eq!(board.persisted().get(1).map(|r| r.read), Some(true));
        assert_eq!(board.list.cards()[0].toggle_label(), "mark as unread");
        board.assert_in_sync();

        board.delete(1)?;
        assert!(board.store.is_empty());
        assert!(board.list.is_placeholder());
        assert!(board.persisted().is_empty());
        Ok(())
    }

    #[test]
    fn submit_trims_inputs() -> Result<()> {
        let mut board = Board::new(MemorySlot::new());
        board.fill("  Ann ", " a@b.com ", "\n hi there \n");
        board.submit()?;
        let record = board.store.get(1).ok_or_else(|| anyhow!("missing record"))?;
        assert_eq!(record.name, "Ann");
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.message, "hi there");
        Ok(())
    }

    #[test]
    fn open_always_leaves_message_read() -> Result<()> {
        let mut board = Board::new(MemorySlot::new());
        board.fill("Ann", "a@b.com", "first");
        board.submit()?;
        board.fill("Bob", "bob@b.com", "second");
        board.submit()?;

        board.open(2)?;
        assert_eq!(board.detail.content().map(|c| c.id), Some(2));
        assert_eq!(board.store.get(2).map(|r| r.read), Some(true));
        close_detail(&mut board.detail);
        assert!(!board.detail.is_open());

        board.open(2)?;
        assert_eq!(board.store.get(2).map(|r| r.read), Some(true));
        assert_eq!(board.persisted().get(2).map(|r| r.read), Some(true));
        assert_eq!(board.store.get(1).map(|r| r.read), Some(false));
        board.assert_in_sync();
        Ok(())
    }

    #[test]
    fn toggle_twice_restores_state_everywhere() -> Result<()> {
        let mut board = Board::new(MemorySlot::new());
        board.fill("Ann", "a@b.com", "hi");
        board.submit()?;
        board.toggle(1)?;
        board.toggle(1)?;
        assert_eq!(board.store.get(1).map(|r| r.read), Some(false));
        assert_eq!(board.persisted().get(1).map(|r| r.read), Some(false));
        board.assert_in_sync();
        Ok(())
    }

    #[test]
    fn stale_ids_are_ignored() -> Result<()> {
        let mut board = Board::new(MemorySlot::new());
        board.fill("Ann", "a@b.com", "hi");
        board.submit()?;
        board.delete(1)?;
        board.delete(1)?;
        board.toggle(1)?;
        board.open(1)?;
        assert!(!board.detail.is_open());
        assert!(board.store.is_empty());
        board.assert_in_sync();
        Ok(())
    }

    #[test]
    fn reload_resumes_ids_and_never_resurrects_deletes() -> Result<()> {
        let mut board = Board::new(MemorySlot::new());
        for name in ["Ann", "Bob", "Cy"] {
            board.fill(name, "x@y.org", "hello");
            board.submit()?;
        }
        board.delete(2)?;

        let slot = board.persistence.slot().clone();
        let mut reloaded = Board::new(slot);
        assert_eq!(reloaded.list.card_ids(), vec![1, 3]);
        reloaded.fill("Dee", "dee@y.org", "later");
        assert_eq!(reloaded.submit()?, SubmitOutcome::Saved(4));
        reloaded.assert_in_sync();
        Ok(())
    }

    #[test]
    fn failed_save_still_renders_the_change() {
        let mut board = Board::new(ReadOnlySlot);
        board.fill("Ann", "a@b.com", "hi");
        assert!(board.submit().is_err());
        assert_eq!(board.store.ids(), vec![1]);
        board.assert_in_sync();

        assert!(board.toggle(1).is_err());
        board.assert_in_sync();

        assert!(board.delete(1).is_err());
        assert!(board.list.is_placeholder());
        board.assert_in_sync();
    }
}
