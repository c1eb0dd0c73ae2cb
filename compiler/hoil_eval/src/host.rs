//! Capabilities the program can drive.
//!
//! The runtime only sees the [`Host`] trait. Call arguments are checked
//! against the capability's parameter list before the host is reached, so
//! backends receive typed values. String arguments arrive with their
//! `{name}` placeholders already resolved by the interpreter.
//!
//! User functions share the call namespace and win over a capability of the
//! same name; [`Capability::from_name`] is only consulted when no user
//! function matches.

mod simulated;

pub use simulated::{Command, Point, SceneObject, SimulatedArm};

use hoil_ir::{HostObject, Value};

use crate::{EvalError, HostError, RuntimeError};

/// A scene object given either by name or by a handle from `FindObject`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ObjectRef<'a> {
    Name(&'a str),
    Handle(&'a HostObject),
}

/// Actuation and scene backend.
pub trait Host {
    fn move_to(&mut self, target: Point) -> Result<(), HostError>;

    fn move_by(&mut self, delta: Point) -> Result<(), HostError>;

    fn open_gripper(&mut self) -> Result<(), HostError>;

    fn close_gripper(&mut self) -> Result<(), HostError>;

    fn position_of(&self, object: ObjectRef<'_>) -> Result<Point, HostError>;

    fn height_of(&self, object: ObjectRef<'_>) -> Result<f64, HostError>;

    fn find_object(&self, name: &str) -> Result<HostObject, HostError>;

    /// Make `object` follow the arm.
    fn attach(&mut self, object: ObjectRef<'_>) -> Result<(), HostError>;

    fn detach(&mut self, object: ObjectRef<'_>) -> Result<(), HostError>;

    fn print(&mut self, line: &str) -> Result<(), HostError>;
}

/// Named entry points of the host surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    MoveTo,
    MoveBy,
    OpenGripper,
    CloseGripper,
    PositionOf,
    HeightOf,
    FindObject,
    Attach,
    Detach,
    Print,
}

impl Capability {
    /// Every capability, in the order they are described to the translator.
    pub const ALL: [Capability; 10] = [
        Capability::MoveTo,
        Capability::MoveBy,
        Capability::OpenGripper,
        Capability::CloseGripper,
        Capability::PositionOf,
        Capability::HeightOf,
        Capability::FindObject,
        Capability::Attach,
        Capability::Detach,
        Capability::Print,
    ];

    /// Case-sensitive lookup by call name (`MoveTo`, `Print`, ...).
    pub fn from_name(name: &str) -> Option<Capability> {
        Capability::ALL.into_iter().find(|cap| cap.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Capability::MoveTo => "MoveTo",
            Capability::MoveBy => "MoveBy",
            Capability::OpenGripper => "OpenGripper",
            Capability::CloseGripper => "CloseGripper",
            Capability::PositionOf => "PositionOf",
            Capability::HeightOf => "HeightOf",
            Capability::FindObject => "FindObject",
            Capability::Attach => "Attach",
            Capability::Detach => "Detach",
            Capability::Print => "Print",
        }
    }

    /// Parameter names, as advertised to the translation service.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            Capability::MoveTo => &["x", "y", "z"],
            Capability::MoveBy => &["dx", "dy", "dz"],
            Capability::OpenGripper | Capability::CloseGripper => &[],
            Capability::PositionOf
            | Capability::HeightOf
            | Capability::Attach
            | Capability::Detach => &["object"],
            Capability::FindObject => &["name"],
            Capability::Print => &["values"],
        }
    }

    /// `Print` takes any number of arguments.
    pub fn is_variadic(self) -> bool {
        matches!(self, Capability::Print)
    }
}

/// Check `args` against `capability` and invoke it on `host`.
#[tracing::instrument(level = "debug", skip_all, fields(capability = capability.name()))]
pub fn dispatch(
    host: &mut dyn Host,
    capability: Capability,
    args: &[Value],
) -> Result<Option<Value>, RuntimeError> {
    let expected = capability.params().len();
    if !capability.is_variadic() && args.len() != expected {
        return Err(EvalError::ArityMismatch {
            name: capability.name().to_owned(),
            expected,
            found: args.len(),
        }
        .into());
    }

    let failed = |source: HostError| RuntimeError::Host {
        capability: capability.name(),
        source,
    };

    let value = match capability {
        Capability::MoveTo => {
            host.move_to(point(capability, args)?).map_err(failed)?;
            None
        }
        Capability::MoveBy => {
            host.move_by(point(capability, args)?).map_err(failed)?;
            None
        }
        Capability::OpenGripper => {
            host.open_gripper().map_err(failed)?;
            None
        }
        Capability::CloseGripper => {
            host.close_gripper().map_err(failed)?;
            None
        }
        Capability::PositionOf => {
            let [x, y, z] = host
                .position_of(object(capability, args)?)
                .map_err(failed)?;
            Some(Value::array_from([
                Value::Number(x),
                Value::Number(y),
                Value::Number(z),
            ]))
        }
        Capability::HeightOf => Some(Value::Number(
            host.height_of(object(capability, args)?).map_err(failed)?,
        )),
        Capability::FindObject => {
            let name = args[0].as_str().ok_or_else(|| {
                argument_type(capability, 0, "string", &args[0])
            })?;
            Some(Value::Opaque(host.find_object(name).map_err(failed)?))
        }
        Capability::Attach => {
            host.attach(object(capability, args)?).map_err(failed)?;
            None
        }
        Capability::Detach => {
            host.detach(object(capability, args)?).map_err(failed)?;
            None
        }
        Capability::Print => {
            let line = args
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            host.print(&line).map_err(failed)?;
            None
        }
    };
    Ok(value)
}

fn point(capability: Capability, args: &[Value]) -> Result<Point, EvalError> {
    let mut out = [0.0; 3];
    for (position, (slot, arg)) in out.iter_mut().zip(args).enumerate() {
        *slot = arg
            .as_number()
            .ok_or_else(|| argument_type(capability, position, "number", arg))?;
    }
    Ok(out)
}

fn object(capability: Capability, args: &[Value]) -> Result<ObjectRef<'_>, EvalError> {
    match &args[0] {
        Value::Str(name) => Ok(ObjectRef::Name(name)),
        Value::Opaque(handle) => Ok(ObjectRef::Handle(handle)),
        other => Err(argument_type(capability, 0, "object name or handle", other)),
    }
}

fn argument_type(
    capability: Capability,
    position: usize,
    expected: &'static str,
    found: &Value,
) -> EvalError {
    EvalError::ArgumentType {
        name: capability.name().to_owned(),
        position: position + 1,
        expected,
        found: found.type_name(),
    }
}
