//! In-process arm simulation.
//!
//! Keeps a pose, a gripper state and a scene of boxes. Attached boxes move
//! with the arm. Every command is appended to [`SimulatedArm::history`].

use std::fmt;

use hoil_ir::HostObject;

use super::{Host, ObjectRef};
use crate::{HostError, SharedPrintHandler};

/// Cartesian coordinates in scene units.
pub type Point = [f64; 3];

/// Pose the arm starts in.
const HOME: Point = [0.0, 0.5, 0.5];

/// An axis-aligned box in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub handle: HostObject,
    /// Centre of the box.
    pub position: Point,
    pub size: Point,
}

/// A command the arm executed.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    MoveTo(Point),
    MoveBy(Point),
    OpenGripper,
    CloseGripper,
    Attach(String),
    Detach(String),
    Print(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::MoveTo([x, y, z]) => write!(f, "MoveTo({x}, {y}, {z})"),
            Command::MoveBy([x, y, z]) => write!(f, "MoveBy({x}, {y}, {z})"),
            Command::OpenGripper => f.write_str("OpenGripper"),
            Command::CloseGripper => f.write_str("CloseGripper"),
            Command::Attach(name) => write!(f, "Attach({name})"),
            Command::Detach(name) => write!(f, "Detach({name})"),
            Command::Print(line) => write!(f, "Print({line:?})"),
        }
    }
}

/// A [`Host`] that simulates a single gripper arm over a scene of boxes.
///
/// Moves are instantaneous and always reachable. Commands are validated
/// before they are recorded, so a rejected command leaves no trace in the
/// history. `Print` goes to the shared print handler and is recorded too.
pub struct SimulatedArm {
    position: Point,
    gripper_open: bool,
    objects: Vec<SceneObject>,
    /// Ids of attached objects.
    attached: Vec<u32>,
    history: Vec<Command>,
    output: SharedPrintHandler,
}

impl SimulatedArm {
    /// An arm at the home pose with an empty scene.
    pub fn new(output: SharedPrintHandler) -> Self {
        SimulatedArm {
            position: HOME,
            gripper_open: true,
            objects: Vec::new(),
            attached: Vec::new(),
            history: Vec::new(),
            output,
        }
    }

    /// Two tables and a small object resting on the first one.
    pub fn with_demo_scene(output: SharedPrintHandler) -> Self {
        let mut arm = SimulatedArm::new(output);
        arm.add_box("table1", [0.5, 0.0, 0.2], [0.2, 0.4, 0.4]);
        arm.add_box("table2", [0.0, 0.5, 0.2], [0.4, 0.2, 0.4]);
        arm.add_box("obj", [0.5, 0.0, 0.4], [0.02, 0.02, 0.1]);
        arm
    }

    /// Add a box, replacing any box with the same name.
    pub fn add_box(&mut self, name: &str, position: Point, size: Point) -> HostObject {
        self.objects.retain(|obj| &*obj.handle.label != name);
        let id = self
            .objects
            .iter()
            .map(|obj| obj.handle.id + 1)
            .max()
            .unwrap_or(0);
        let handle = HostObject::new(id, name);
        self.objects.push(SceneObject {
            handle: handle.clone(),
            position,
            size,
        });
        handle
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_gripper_open(&self) -> bool {
        self.gripper_open
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|obj| &*obj.handle.label == name)
    }

    /// Names of the objects currently following the arm.
    pub fn attached(&self) -> Vec<&str> {
        self.objects
            .iter()
            .filter(|obj| self.attached.contains(&obj.handle.id))
            .map(|obj| &*obj.handle.label)
            .collect()
    }

    pub fn history(&self) -> &[Command] {
        &self.history
    }

    fn record(&mut self, command: Command) {
        tracing::debug!(%command, "arm command");
        self.history.push(command);
    }

    fn resolve(&self, object: ObjectRef<'_>) -> Result<usize, HostError> {
        let found = match object {
            ObjectRef::Name(name) => self.objects.iter().position(|obj| &*obj.handle.label == name),
            ObjectRef::Handle(handle) => self.objects.iter().position(|obj| obj.handle.id == handle.id),
        };
        found.ok_or_else(|| {
            let label = match object {
                ObjectRef::Name(name) => name,
                ObjectRef::Handle(handle) => &*handle.label,
            };
            HostError::new(format!("no object named `{label}` in the scene"))
        })
    }

    fn travel(&mut self, target: Point) -> Result<(), HostError> {
        if target.iter().any(|c| !c.is_finite()) {
            return Err(HostError::new(format!(
                "target ({}, {}, {}) is not a finite point",
                target[0], target[1], target[2]
            )));
        }
        let delta = [
            target[0] - self.position[0],
            target[1] - self.position[1],
            target[2] - self.position[2],
        ];
        for obj in &mut self.objects {
            if self.attached.contains(&obj.handle.id) {
                for (coord, d) in obj.position.iter_mut().zip(delta) {
                    *coord += d;
                }
            }
        }
        self.position = target;
        Ok(())
    }
}

impl Host for SimulatedArm {
    fn move_to(&mut self, target: Point) -> Result<(), HostError> {
        self.travel(target)?;
        self.record(Command::MoveTo(target));
        Ok(())
    }

    fn move_by(&mut self, delta: Point) -> Result<(), HostError> {
        let target = [
            self.position[0] + delta[0],
            self.position[1] + delta[1],
            self.position[2] + delta[2],
        ];
        self.travel(target)?;
        self.record(Command::MoveBy(delta));
        Ok(())
    }

    fn open_gripper(&mut self) -> Result<(), HostError> {
        self.gripper_open = true;
        self.record(Command::OpenGripper);
        Ok(())
    }

    fn close_gripper(&mut self) -> Result<(), HostError> {
        self.gripper_open = false;
        self.record(Command::CloseGripper);
        Ok(())
    }

    fn position_of(&self, object: ObjectRef<'_>) -> Result<Point, HostError> {
        let index = self.resolve(object)?;
        Ok(self.objects[index].position)
    }

    fn height_of(&self, object: ObjectRef<'_>) -> Result<f64, HostError> {
        let index = self.resolve(object)?;
        Ok(self.objects[index].size[2])
    }

    fn find_object(&self, name: &str) -> Result<HostObject, HostError> {
        let index = self.resolve(ObjectRef::Name(name))?;
        Ok(self.objects[index].handle.clone())
    }

    fn attach(&mut self, object: ObjectRef<'_>) -> Result<(), HostError> {
        let index = self.resolve(object)?;
        let handle = self.objects[index].handle.clone();
        if self.attached.contains(&handle.id) {
            return Err(HostError::new(format!("`{}` is already attached", handle.label)));
        }
        self.attached.push(handle.id);
        self.record(Command::Attach(handle.label.to_string()));
        Ok(())
    }

    fn detach(&mut self, object: ObjectRef<'_>) -> Result<(), HostError> {
        let index = self.resolve(object)?;
        let handle = self.objects[index].handle.clone();
        let Some(slot) = self.attached.iter().position(|&id| id == handle.id) else {
            return Err(HostError::new(format!("`{}` is not attached", handle.label)));
        };
        self.attached.remove(slot);
        self.record(Command::Detach(handle.label.to_string()));
        Ok(())
    }

    fn print(&mut self, line: &str) -> Result<(), HostError> {
        self.output.line(line);
        self.record(Command::Print(line.to_owned()));
        Ok(())
    }
}
