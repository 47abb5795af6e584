//! Draw tasks and their registry

use magi_core::Result;

/// Per-frame draw callback. Must only touch a surface it owns and never block.
pub type DrawFn = Box<dyn FnMut() -> Result<()>>;

/// An effect that can be drawn by the frame scheduler
///
/// Tasks run in registration order, once per accepted frame.
pub trait RenderTask {
    /// Draw one frame
    fn draw(&mut self) -> Result<()>;
}

struct DrawTask {
    name: String,
    draw: DrawFn,
}

/// Ordered, name-keyed set of draw tasks.
///
/// Registering an existing name replaces its callback in place, so a task
/// keeps its slot in the draw order and initialization code that runs twice
/// cannot double-draw.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: Vec<DrawTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a task. Returns true if a task with this name was replaced.
    pub fn register(&mut self, name: &str, draw: DrawFn) -> bool {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.name == name) {
            existing.draw = draw;
            return true;
        }
        self.tasks.push(DrawTask {
            name: name.to_string(),
            draw,
        });
        false
    }

    /// Remove a task. Returns false if no task had this name.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.name != name);
        self.tasks.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.iter().any(|t| t.name == name)
    }

    /// Task names in draw order
    pub fn names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every task once in order. A failing task is logged and the rest
    /// still run. Returns `(ran, failed)`.
    pub fn run_all(&mut self) -> (usize, usize) {
        let mut failed = 0;
        for task in &mut self.tasks {
            if let Err(err) = (task.draw)() {
                failed += 1;
                log::warn!("[render_core] task '{}' failed: {}", task.name, err);
            }
        }
        (self.tasks.len(), failed)
    }
}
