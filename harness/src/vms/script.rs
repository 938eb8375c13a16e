//! `ScriptedSpace`: a state space defined by a hand-built tree.
//!
//! Each node scripts what the VM would report at that state: thread counts,
//! the scheduling decision that produced it, classification flags, an
//! optional violation, and the user-heuristic cell. The engine then drives
//! the script through the normal [`StateSpace`] seam, so tests exercise the
//! real driver against fully controlled shapes.
//!
//! StateIds are assigned in discovery order, starting at 0 for the root —
//! the same monotonic numbering a real VM produces. Snapshots are node
//! tokens; restoring one repositions the cursor and rebuilds the
//! chronological scheduling history from the ancestor chain.

use statewalk_search::StateSpace;
use statewalk_vm::{PropertyViolation, SchedulingChoice, Snapshot, StateId, ThreadId};

/// Script for a single state.
#[derive(Debug, Clone)]
pub struct ScriptedState {
    /// Live target-thread count reported at this state.
    pub alive: usize,
    /// Runnable target-thread count reported at this state.
    pub runnable: usize,
    /// Thread reported for the transition into this state. Defaults to the
    /// thread of `choice` when unset.
    pub last_thread: Option<ThreadId>,
    /// Name of the last scheduled thread.
    pub last_thread_name: Option<String>,
    /// The scheduling decision that produced this state (absent for states
    /// reached without a thread choice, e.g. the root).
    pub choice: Option<SchedulingChoice>,
    /// State has no successors by definition.
    pub end_state: bool,
    /// State is excluded from exploration.
    pub ignored: bool,
    /// VM flags the state unconditionally urgent.
    pub interesting: bool,
    /// VM flags the state last-resort only.
    pub boring: bool,
    /// State matching recognizes this state as already visited.
    pub seen_before: bool,
    /// Violation triggered by the transition into this state.
    pub violation: Option<PropertyViolation>,
    /// Value of the user-heuristic escape hatch at this state.
    pub user_value: i64,
}

impl Default for ScriptedState {
    fn default() -> Self {
        Self {
            alive: 1,
            runnable: 1,
            last_thread: None,
            last_thread_name: None,
            choice: None,
            end_state: false,
            ignored: false,
            interesting: false,
            boring: false,
            seen_before: false,
            violation: None,
            user_value: 0,
        }
    }
}

impl ScriptedState {
    /// Script with the given thread counts.
    #[must_use]
    pub fn threads(alive: usize, runnable: usize) -> Self {
        Self {
            alive,
            runnable,
            ..Self::default()
        }
    }

    /// Record the scheduling decision producing this state.
    #[must_use]
    pub fn chosen(mut self, thread: u32, runnable: &[u32]) -> Self {
        self.choice = Some(SchedulingChoice::new(
            ThreadId::new(thread),
            runnable.iter().copied().map(ThreadId::new).collect(),
        ));
        self
    }

    /// Name the thread that produced this state.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.last_thread_name = Some(name.to_string());
        self
    }

    /// Mark as an end state.
    #[must_use]
    pub fn end(mut self) -> Self {
        self.end_state = true;
        self
    }

    /// Set the user-heuristic cell.
    #[must_use]
    pub fn valued(mut self, user_value: i64) -> Self {
        self.user_value = user_value;
        self
    }

    /// Attach a violation to the transition into this state.
    #[must_use]
    pub fn violating(mut self, property: &str, detail: &str) -> Self {
        self.violation = Some(PropertyViolation::new(property, detail));
        self
    }

    /// Mark as matching an already visited state.
    #[must_use]
    pub fn visited(mut self) -> Self {
        self.seen_before = true;
        self
    }
}

#[derive(Debug)]
struct Node {
    script: ScriptedState,
    parent: Option<usize>,
    children: Vec<usize>,
    next_child: usize,
    assigned_id: Option<StateId>,
    depth: u32,
}

/// A scripted, tree-shaped state space.
#[derive(Debug)]
pub struct ScriptedSpace {
    nodes: Vec<Node>,
    current: usize,
    history: Vec<SchedulingChoice>,
    next_id: u64,
    current_is_new: bool,
}

impl ScriptedSpace {
    /// Create a space whose root reports the given script.
    #[must_use]
    pub fn new(root: ScriptedState) -> Self {
        Self {
            nodes: vec![Node {
                script: root,
                parent: None,
                children: Vec::new(),
                next_child: 0,
                assigned_id: Some(StateId::new(0)),
                depth: 0,
            }],
            current: 0,
            history: Vec::new(),
            next_id: 1,
            current_is_new: true,
        }
    }

    /// Attach a child state under `parent` (0 is the root); returns the new
    /// node's handle for further attachment.
    pub fn add_child(&mut self, parent: usize, script: ScriptedState) -> usize {
        assert!(parent < self.nodes.len(), "unknown parent node");
        let index = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(Node {
            script,
            parent: Some(parent),
            children: Vec::new(),
            next_child: 0,
            assigned_id: None,
            depth,
        });
        self.nodes[parent].children.push(index);
        index
    }

    /// Number of distinct states discovered so far (ids handed out).
    #[must_use]
    pub fn discovered_states(&self) -> u64 {
        self.next_id
    }

    fn current_node(&self) -> &Node {
        &self.nodes[self.current]
    }

    fn rebuild_history(&mut self) {
        let mut choices = Vec::new();
        let mut cursor = Some(self.current);
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            if let Some(choice) = &node.script.choice {
                choices.push(choice.clone());
            }
            cursor = node.parent;
        }
        choices.reverse();
        self.history = choices;
    }
}

impl StateSpace for ScriptedSpace {
    fn forward(&mut self) -> bool {
        let node = &mut self.nodes[self.current];
        if node.next_child >= node.children.len() {
            return false;
        }
        let child_index = node.children[node.next_child];
        node.next_child += 1;
        self.current = child_index;

        let child = &mut self.nodes[child_index];
        let first_visit = child.assigned_id.is_none();
        if first_visit {
            child.assigned_id = Some(StateId::new(self.next_id));
            self.next_id += 1;
        }
        self.current_is_new = first_visit && !child.script.seen_before;
        if let Some(choice) = child.script.choice.clone() {
            self.history.push(choice);
        }
        true
    }

    fn backtrack(&mut self) -> bool {
        let Some(parent) = self.current_node().parent else {
            return false;
        };
        if self.current_node().script.choice.is_some() {
            self.history.pop();
        }
        self.current = parent;
        self.current_is_new = false;
        true
    }

    fn snapshot(&mut self) -> Snapshot {
        Snapshot::new(self.current as u64)
    }

    fn restore(&mut self, snapshot: Snapshot) {
        let index = usize::try_from(snapshot.token()).expect("snapshot token fits usize");
        assert!(index < self.nodes.len(), "restoring an unknown snapshot");
        self.current = index;
        self.current_is_new = false;
        self.rebuild_history();
    }

    fn state_id(&self) -> StateId {
        self.current_node()
            .assigned_id
            .expect("current state has been reached")
    }

    fn path_length(&self) -> u32 {
        self.current_node().depth
    }

    fn is_new_state(&self) -> bool {
        self.current_is_new
    }

    fn is_end_state(&self) -> bool {
        self.current_node().script.end_state
    }

    fn is_ignored_state(&self) -> bool {
        self.current_node().script.ignored
    }

    fn is_interesting_state(&self) -> bool {
        self.current_node().script.interesting
    }

    fn is_boring_state(&self) -> bool {
        self.current_node().script.boring
    }

    fn violated_property(&self) -> Option<PropertyViolation> {
        self.current_node().script.violation.clone()
    }

    fn alive_thread_count(&self) -> usize {
        self.current_node().script.alive
    }

    fn runnable_thread_count(&self) -> usize {
        self.current_node().script.runnable
    }

    fn last_scheduled_thread(&self) -> Option<ThreadId> {
        let script = &self.current_node().script;
        script
            .last_thread
            .or_else(|| script.choice.as_ref().map(|c| c.thread))
    }

    fn last_scheduled_thread_name(&self) -> Option<String> {
        self.current_node().script.last_thread_name.clone()
    }

    fn scheduling_history(&self) -> &[SchedulingChoice] {
        &self.history
    }

    fn user_heuristic_value(&self) -> i64 {
        self.current_node().script.user_value
    }
}
