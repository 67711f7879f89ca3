//! Generic state holder shared by every screen
//!
//! A screen's view model owns a `Store`: the current state on a watch
//! channel, a queue of one-shot events, an action queue drained by a single
//! task, and a `Scope` whose tasks are aborted when the view model is dropped.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinSet};

/// Tasks tied to one screen. Dropping the scope aborts them.
#[derive(Default)]
pub struct Scope {
    tasks: Mutex<JoinSet<()>>,
}

impl Scope {
    pub fn spawn<F>(&self, task: F) -> AbortHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task)
    }

    pub fn cancel_all(&self) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}

/// Cloneable writer side of a store, for tasks running in its scope
pub struct StoreHandle<S, E> {
    state: Arc<watch::Sender<S>>,
    events: mpsc::UnboundedSender<E>,
}

impl<S, E> Clone for StoreHandle<S, E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            events: self.events.clone(),
        }
    }
}

impl<S: Clone, E> StoreHandle<S, E> {
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    pub fn set_state(&self, state: S) {
        self.state.send_replace(state);
    }

    pub fn emit(&self, event: E) {
        // The receiver lives in the store; once it is gone nobody is listening.
        let _ = self.events.send(event);
    }
}

pub struct Store<A, S, E> {
    handle: StoreHandle<S, E>,
    actions: mpsc::UnboundedSender<A>,
    pending_actions: Mutex<Option<mpsc::UnboundedReceiver<A>>>,
    events: tokio::sync::Mutex<mpsc::UnboundedReceiver<E>>,
    scope: Scope,
}

impl<A, S: Clone, E> Store<A, S, E> {
    pub fn new(initial: S) -> Self {
        let (state, _) = watch::channel(initial);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        Self {
            handle: StoreHandle {
                state: Arc::new(state),
                events: events_tx,
            },
            actions: actions_tx,
            pending_actions: Mutex::new(Some(actions_rx)),
            events: tokio::sync::Mutex::new(events_rx),
            scope: Scope::default(),
        }
    }

    pub fn handle(&self) -> StoreHandle<S, E> {
        self.handle.clone()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn state(&self) -> S {
        self.handle.state()
    }

    pub fn set_state(&self, state: S) {
        self.handle.set_state(state);
    }

    pub fn emit(&self, event: E) {
        self.handle.emit(event);
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.handle.state.subscribe()
    }

    pub fn dispatch(&self, action: A) {
        if self.actions.send(action).is_err() {
            tracing::warn!("Action dropped, state holder is shutting down");
        }
    }

    pub async fn next_event(&self) -> Option<E> {
        self.events.lock().await.recv().await
    }

    pub fn try_next_event(&self) -> Option<E> {
        self.events.try_lock().ok()?.try_recv().ok()
    }

    fn take_action_receiver(&self) -> Option<mpsc::UnboundedReceiver<A>> {
        self.pending_actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// A screen's state machine: (state, events, send_action).
#[async_trait]
pub trait ViewModel: Send + Sync + Sized + 'static {
    type Action: Send + 'static;
    type State: Clone + Send + Sync + 'static;
    type Event: Send + 'static;

    fn store(&self) -> &Store<Self::Action, Self::State, Self::Event>;

    /// Runs on the action task, one action at a time in arrival order.
    async fn handle_action(&self, action: Self::Action);

    fn send_action(&self, action: Self::Action) {
        self.store().dispatch(action);
    }

    fn state(&self) -> Self::State {
        self.store().state()
    }

    fn subscribe(&self) -> watch::Receiver<Self::State> {
        self.store().subscribe()
    }

    async fn next_event(&self) -> Option<Self::Event> {
        self.store().next_event().await
    }

    fn try_next_event(&self) -> Option<Self::Event> {
        self.store().try_next_event()
    }
}

/// Start draining the view model's action queue.
///
/// The task only holds a weak reference between actions, so dropping the last
/// `Arc` ends it. Calling this twice is a no-op.
pub fn launch<VM: ViewModel>(vm: &Arc<VM>) {
    let Some(mut actions) = vm.store().take_action_receiver() else {
        return;
    };
    let weak = Arc::downgrade(vm);
    vm.store().scope().spawn(async move {
        while let Some(action) = actions.recv().await {
            let Some(vm) = weak.upgrade() else {
                break;
            };
            vm.handle_action(action).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug)]
    enum CounterAction {
        AddSlowly(u32),
        Fail,
    }

    #[derive(Debug, PartialEq)]
    enum CounterEvent {
        Failed,
    }

    struct Counter {
        store: Store<CounterAction, Vec<u32>, CounterEvent>,
    }

    #[async_trait]
    impl ViewModel for Counter {
        type Action = CounterAction;
        type State = Vec<u32>;
        type Event = CounterEvent;

        fn store(&self) -> &Store<CounterAction, Vec<u32>, CounterEvent> {
            &self.store
        }

        async fn handle_action(&self, action: CounterAction) {
            match action {
                CounterAction::AddSlowly(n) => {
                    // a later action must not overtake this one
                    tokio::time::sleep(Duration::from_millis(100 / u64::from(n))).await;
                    let mut seen = self.state();
                    seen.push(n);
                    self.store.set_state(seen);
                }
                CounterAction::Fail => self.store.emit(CounterEvent::Failed),
            }
        }
    }

    fn counter() -> Arc<Counter> {
        let vm = Arc::new(Counter {
            store: Store::new(Vec::new()),
        });
        launch(&vm);
        vm
    }

    #[tokio::test(start_paused = true)]
    async fn actions_run_one_at_a_time_in_order() {
        let vm = counter();
        vm.send_action(CounterAction::AddSlowly(1));
        vm.send_action(CounterAction::AddSlowly(2));
        vm.send_action(CounterAction::AddSlowly(4));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(vm.state(), vec![1, 2, 4]);
    }

    #[tokio::test]
    async fn events_are_delivered_once() {
        let vm = counter();
        vm.send_action(CounterAction::Fail);

        assert_eq!(vm.next_event().await, Some(CounterEvent::Failed));
        assert_eq!(vm.try_next_event(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_scope_aborts_its_tasks() {
        let scope = Scope::default();
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        scope.spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            let _ = tx.send(());
        });
        drop(scope);

        // sender dropped by the abort, never used
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn action_task_ends_with_the_view_model() {
        let vm = counter();
        let weak = Arc::downgrade(&vm);
        drop(vm);
        tokio::task::yield_now().await;
        assert!(weak.upgrade().is_none());
    }
}
