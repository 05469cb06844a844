//! Site chrome controller
//!
//! Binds every chrome widget present on the page and routes page events to
//! them. Clicks bubble from the clicked element up to the root, so a click
//! on an icon inside a button reaches the button's handler.

use folio_animation::{AnimationScheduler, TweenEvent};
use folio_core::{Document, ElementId, KvStore};

use crate::back_to_top::BackToTop;
use crate::counters::Counters;
use crate::error::Result;
use crate::faq::FaqAccordion;
use crate::form::{ContactForm, SubmitOutcome};
use crate::navigation::{anchor_target, MobileMenu, Navbar};
use crate::preloader::Preloader;
use crate::projects::ProjectGrid;
use crate::relay::{ContactConfig, EmailRelay};
use crate::task::{ChromeAction, ChromeTask, CompletionTasks, Deferred};
use crate::theme::ThemeSwitcher;
use crate::visibility::VisibilityClasses;

/// What the host must do after a chrome event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reaction {
    pub deferred: Vec<Deferred>,
    pub actions: Vec<ChromeAction>,
}

impl Reaction {
    pub fn is_empty(&self) -> bool {
        self.deferred.is_empty() && self.actions.is_empty()
    }

    pub fn extend(&mut self, other: Reaction) {
        self.deferred.extend(other.deferred);
        self.actions.extend(other.actions);
    }

    fn deferred(deferred: Vec<Deferred>) -> Self {
        Self {
            deferred,
            actions: Vec::new(),
        }
    }

    fn action(action: ChromeAction) -> Self {
        Self {
            deferred: Vec::new(),
            actions: vec![action],
        }
    }
}

pub struct Chrome {
    navbar: Navbar,
    menu: MobileMenu,
    theme: ThemeSwitcher,
    counters: Counters,
    back_to_top: BackToTop,
    preloader: Preloader,
    visibility: VisibilityClasses,
    form: Option<ContactForm>,
    faq: FaqAccordion,
    projects: ProjectGrid,
    completions: CompletionTasks,
}

impl Chrome {
    /// Bind the chrome of the page at `page_path`
    pub fn setup(doc: &mut Document, page_path: &str, store: &dyn KvStore) -> Result<Self> {
        let chrome = Self {
            navbar: Navbar::setup(doc, page_path)?,
            menu: MobileMenu::setup(doc),
            theme: ThemeSwitcher::setup(doc, store)?,
            counters: Counters::setup(doc)?,
            back_to_top: BackToTop::setup(doc),
            preloader: Preloader::setup(doc),
            visibility: VisibilityClasses::setup(doc)?,
            form: ContactForm::setup(doc)?,
            faq: FaqAccordion::setup(doc)?,
            projects: ProjectGrid::setup(doc)?,
            completions: CompletionTasks::new(),
        };
        tracing::debug!(
            page = page_path,
            faq_items = chrome.faq.len(),
            projects = chrome.projects.cards().len(),
            contact_form = chrome.form.is_some(),
            "Chrome ready"
        );
        Ok(chrome)
    }

    pub fn theme(&self) -> &ThemeSwitcher {
        &self.theme
    }

    pub fn form(&self) -> Option<&ContactForm> {
        self.form.as_ref()
    }

    pub fn projects(&self) -> &ProjectGrid {
        &self.projects
    }

    pub fn on_load(&self) -> Reaction {
        Reaction::deferred(self.preloader.on_load().into_iter().collect())
    }

    pub fn on_scroll(&mut self, doc: &mut Document) -> Reaction {
        self.navbar.on_scroll(doc);
        self.back_to_top.on_scroll(doc);
        self.visibility.on_scroll(doc);
        Reaction::deferred(self.counters.on_scroll(doc))
    }

    /// Dispatch a click on `target` to every handler along its ancestor chain
    pub fn on_click(
        &mut self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        store: &mut dyn KvStore,
        target: ElementId,
    ) -> Result<Reaction> {
        let mut reaction = Reaction::default();
        let mut current = Some(target);
        while let Some(node) = current {
            current = doc.parent(node);

            if self.menu.is_hamburger(node) {
                self.menu.toggle(doc);
            }
            if self.navbar.is_nav_link(node) {
                self.menu.close(doc);
            }
            if doc.get(node).is_some_and(|el| el.tag == "a") {
                if let Some(action) = anchor_target(doc, node) {
                    reaction.actions.push(action);
                }
            }
            if self.theme.is_toggle(node) {
                self.theme.toggle(doc, store)?;
            }
            if self.back_to_top.is_button(node) {
                reaction.actions.extend(self.back_to_top.on_click());
            }
            if self.faq.is_question(node) {
                self.faq.on_question_click(doc, scheduler, node);
            }
            if self.projects.is_filter_button(node) {
                reaction.deferred.extend(self.projects.on_filter_click(
                    doc,
                    scheduler,
                    &mut self.completions,
                    node,
                ));
            }
            if self.projects.is_load_more(node) {
                reaction.deferred.extend(self.projects.on_load_more_click(
                    doc,
                    scheduler,
                    &mut self.completions,
                ));
            }
        }
        Ok(reaction)
    }

    pub fn on_pointer_enter(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        element: ElementId,
    ) {
        if self.projects.is_card(element) {
            self.projects.on_card_enter(doc, scheduler, element);
        }
    }

    pub fn on_pointer_leave(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        element: ElementId,
    ) {
        if self.projects.is_card(element) {
            self.projects.on_card_leave(doc, scheduler, element);
        }
    }

    pub fn on_focus(
        &mut self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        field: ElementId,
    ) {
        if let Some(form) = &self.form {
            form.on_focus(doc, scheduler, &mut self.completions, field);
        }
    }

    pub fn on_blur(&self, doc: &mut Document, scheduler: &mut AnimationScheduler, field: ElementId) {
        if let Some(form) = &self.form {
            form.on_blur(doc, scheduler, field);
        }
    }

    pub fn on_input(&self, doc: &mut Document, field: ElementId) {
        if let Some(form) = &self.form {
            form.on_input(doc, field);
        }
    }

    /// Submit the contact form; `None` on pages without one
    pub async fn submit(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        relay: &mut dyn EmailRelay,
        config: &ContactConfig,
    ) -> Option<(SubmitOutcome, Reaction)> {
        let form = self.form.as_ref()?;
        let outcome = form.submit(doc, scheduler, relay, config).await;
        let reaction = Reaction::deferred(outcome.deferred().into_iter().collect());
        Some((outcome, reaction))
    }

    /// Run the completion tasks of finished tweens
    pub fn on_tween_events(
        &mut self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        events: &[TweenEvent],
    ) -> Reaction {
        let mut reaction = Reaction::default();
        for event in events {
            if let Some(task) = self.completions.resolve(event) {
                reaction.extend(self.run(doc, scheduler, task));
            }
        }
        reaction
    }

    /// Run a task that came due
    pub fn run(
        &mut self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        task: ChromeTask,
    ) -> Reaction {
        tracing::trace!(?task, "Running chrome task");
        match task {
            ChromeTask::HidePreloader => {
                self.preloader.hide(doc);
                Reaction::default()
            }
            ChromeTask::CounterStep(counter) => {
                Reaction::deferred(Counters::step(doc, counter).into_iter().collect())
            }
            ChromeTask::HideSuccessBanner => {
                if let Some(form) = &self.form {
                    form.hide_success(doc);
                }
                Reaction::default()
            }
            ChromeTask::ShowFilteredCard(card) => {
                self.projects.show_filtered_card(doc, scheduler, card);
                Reaction::default()
            }
            ChromeTask::ShowMoreCard(card) => {
                Reaction::action(self.projects.show_more_card(doc, scheduler, card))
            }
            ChromeTask::CollapseCard(card) => {
                self.projects.collapse_card(doc, card);
                Reaction::default()
            }
            ChromeTask::Undisplay(element) => {
                doc.set_style(element, "display", "none");
                Reaction::default()
            }
            ChromeTask::RemoveElement(element) => {
                doc.remove(element);
                Reaction::default()
            }
        }
    }
}
