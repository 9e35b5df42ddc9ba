//! The runtime-typed value carrier.

use cask_codec::{EntityReader, EntityWriter};
use cask_types::{
    validation_error, ContainerKind, ElementKind, Error, Result, ValidationFlags, Validator,
};

use crate::{
    dispatch::{self, DynOps, Payload},
    Managed,
};

/// A concrete type that can live inside a [`Varying`]: one of the
/// element × container combinations of the format.
pub trait VaryingPayload: std::any::Any + Send + Sync + 'static {
    const ELEMENT: ElementKind;
    const CONTAINER: ContainerKind;
}

struct VaryingState {
    element: ElementKind,
    container: ContainerKind,
    ops: DynOps,
    data: Box<Payload>,
}

/// A value whose element and container kinds are data.
///
/// A `Varying` is either uninitialized (no kind, no payload) or holds
/// exactly one payload of one element × container combination, owned
/// exclusively. All operations on the payload go through the dispatch
/// table for the tag pair. Moving a `Varying` leaves the source
/// uninitialized; clearing empties the payload but keeps the kind.
#[derive(Default)]
pub struct Varying {
    state: Option<VaryingState>,
}

impl Varying {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty payload of the given kind pair, replacing
    /// whatever the object held. Fails with [`Error::InvalidParam`] for an
    /// unsupported combination.
    pub fn initialize(&mut self, element: ElementKind, container: ContainerKind) -> Result<()> {
        self.state = None;
        let Some(ops) = dispatch::ops(element, container) else {
            log::error!("unsupported varying type combination {element:?} × {container:?}");
            return Err(Error::InvalidParam);
        };
        self.state = Some(VaryingState {
            element,
            container,
            ops,
            data: (ops.new)(),
        });
        Ok(())
    }

    /// Typed [`Varying::initialize`]: allocate a `P` payload and hand it
    /// back for filling in.
    pub fn initialize_as<P: VaryingPayload>(&mut self) -> Result<&mut P> {
        self.initialize(P::ELEMENT, P::CONTAINER)?;
        self.data_mut::<P>().ok_or(Error::Undefined)
    }

    /// Drop the payload and kind, leaving the object uninitialized.
    pub fn deinitialize(&mut self) {
        self.state = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// The element and container kinds currently held, if initialized.
    pub fn kind(&self) -> Option<(ElementKind, ContainerKind)> {
        self.state
            .as_ref()
            .map(|state| (state.element, state.container))
    }

    /// Whether the payload is of type `P`.
    pub fn is_a<P: VaryingPayload>(&self) -> bool {
        self.kind() == Some((P::ELEMENT, P::CONTAINER))
    }

    /// The payload as a `P`, or `None` if the object holds another type or
    /// is uninitialized.
    pub fn data<P: VaryingPayload>(&self) -> Option<&P> {
        self.state
            .as_ref()
            .filter(|state| (state.element, state.container) == (P::ELEMENT, P::CONTAINER))
            .and_then(|state| state.data.downcast_ref())
    }

    pub fn data_mut<P: VaryingPayload>(&mut self) -> Option<&mut P> {
        self.state
            .as_mut()
            .filter(|state| (state.element, state.container) == (P::ELEMENT, P::CONTAINER))
            .and_then(|state| state.data.downcast_mut())
    }
}

impl Clone for Varying {
    fn clone(&self) -> Self {
        let state = self.state.as_ref().map(|state| {
            let mut data = (state.ops.new)();
            let copied = (state.ops.copy)(&mut *data, &*state.data);
            debug_assert!(copied, "cloning a varying of its own type cannot fail");
            VaryingState {
                element: state.element,
                container: state.container,
                ops: state.ops,
                data,
            }
        });
        Self { state }
    }
}

impl PartialEq for Varying {
    fn eq(&self, other: &Self) -> bool {
        match (&self.state, &other.state) {
            (None, None) => true,
            (Some(lhs), Some(rhs)) => {
                lhs.element == rhs.element
                    && lhs.container == rhs.container
                    && (lhs.ops.equals)(&*lhs.data, &*rhs.data)
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for Varying {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            Some((element, container)) => {
                write!(f, "Varying({element:?} × {container:?})")
            }
            None => write!(f, "Varying(uninitialized)"),
        }
    }
}

impl Managed for Varying {
    /// Empty the payload; the kind tags survive. Clearing an uninitialized
    /// object is a no-op.
    fn clear(&mut self) {
        if let Some(state) = &mut self.state {
            let cleared = (state.ops.clear)(&mut *state.data);
            debug_assert!(cleared, "clearing a varying of its own type cannot fail");
        }
    }

    /// Written as two small chunks `ElTy` and `CnTy` (the `u16` kind tags)
    /// followed by the `Data` chunk whose shape the pair decides. An
    /// uninitialized object cannot be written; wrap the `Varying` in an
    /// optional if optionality is needed.
    fn write(&self, writer: &mut EntityWriter<'_>) -> Result<()> {
        let Some(state) = &self.state else {
            log::error!("cannot write an uninitialized varying to a stream");
            return Err(Error::NotInitialized);
        };
        writer.write("ElTy", &state.element.as_u16())?;
        writer.write("CnTy", &state.container.as_u16())?;
        (state.ops.write)(&*state.data, writer, "Data")
    }

    fn read(&mut self, reader: &mut EntityReader<'_, '_>) -> Result<()> {
        self.state = None;

        let element_tag: u16 = reader.read("ElTy")?;
        let container_tag: u16 = reader.read("CnTy")?;
        let (Some(element), Some(container)) = (
            ElementKind::from_u16(element_tag),
            ContainerKind::from_u16(container_tag),
        ) else {
            log::error!(
                "unknown varying type tags in stream: element {element_tag:#06x}, \
                 container {container_tag:#06x}"
            );
            return Err(Error::CantRead);
        };

        if self.initialize(element, container).is_err() {
            return Err(Error::CantRead);
        }
        match &mut self.state {
            Some(state) => (state.ops.read)(&mut *state.data, reader, "Data"),
            None => Err(Error::Undefined),
        }
    }

    /// An uninitialized `Varying` is invalid; everything else passes.
    fn validate(&self, validator: &mut Validator) -> Result<()> {
        if !self.is_initialized() {
            validation_error!(
                validator,
                ValidationFlags::NULL_NOT_ALLOWED,
                "the varying object is not initialized; use an optional for optional data"
            );
        }
        Ok(())
    }
}
