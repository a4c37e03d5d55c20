//! Runs the reducer against a real gateway and view.
//!
//! One task owns [`UiState`]; gateway calls are spawned and report back over a
//! channel, so state is only ever touched from [`App::run`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::controller::{Action, Effect, Notice, UiState};
use crate::debounce::Debouncer;
use crate::gateway::StudentGateway;
use crate::render::{self, Screen};

/// Where rendered snapshots and notifications go.
pub trait View {
    fn render(&mut self, screen: &Screen);
    fn notify(&mut self, notice: &Notice);
}

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub struct App<V> {
    gateway: Arc<dyn StudentGateway>,
    view: V,
    state: UiState,
    debouncer: Debouncer,
    today: fn() -> NaiveDate,
    results_tx: mpsc::UnboundedSender<Action>,
    results_rx: mpsc::UnboundedReceiver<Action>,
}

impl<V: View> App<V> {
    pub fn new(gateway: Arc<dyn StudentGateway>, view: V, debounce: Duration) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            view,
            state: UiState::default(),
            debouncer: Debouncer::new(debounce),
            today: local_today,
            results_tx,
            results_rx,
        }
    }

    /// Replaces the clock used for ages, study periods and date validation.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Processes UI events until the sender side closes, then returns the
    /// final state. The first listing is scheduled right away.
    pub async fn run(mut self, mut events: mpsc::Receiver<Action>) -> UiState {
        self.debouncer.trigger();
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(action) => self.dispatch(action),
                    None => break,
                },
                Some(result) = self.results_rx.recv() => self.dispatch(result),
                _ = self.debouncer.fired() => self.dispatch(Action::RequestFetch),
            }
        }
        log::debug!("event stream closed");
        self.state
    }

    fn dispatch(&mut self, action: Action) {
        let today = (self.today)();
        for effect in self.state.update(action, today) {
            self.perform(effect, today);
        }
    }

    fn perform(&mut self, effect: Effect, today: NaiveDate) {
        match effect {
            Effect::ScheduleFetch => self.debouncer.trigger(),
            Effect::Fetch {
                generation,
                filters,
            } => {
                let gateway = self.gateway.clone();
                self.spawn(async move {
                    let result = gateway.list(&filters).await;
                    Action::Fetched { generation, result }
                });
            }
            Effect::Create(student) => {
                let gateway = self.gateway.clone();
                self.spawn(async move { Action::Created(gateway.create(&student).await) });
            }
            Effect::Update(id, student) => {
                let gateway = self.gateway.clone();
                self.spawn(async move {
                    let result = gateway.update(&id, &student).await;
                    Action::Updated(id, result)
                });
            }
            Effect::Delete(id) => {
                let gateway = self.gateway.clone();
                self.spawn(async move {
                    let result = gateway.delete(&id).await;
                    Action::Deleted(id, result)
                });
            }
            Effect::Render => self.view.render(&render::screen(&self.state, today)),
            Effect::Notify(notice) => self.view.notify(&notice),
        }
    }

    fn spawn<F>(&self, request: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let results = self.results_tx.clone();
        tokio::spawn(async move {
            if results.send(request.await).is_err() {
                log::debug!("app stopped before a response arrived");
            }
        });
    }
}
