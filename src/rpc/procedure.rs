//! Procedures and their type-erased thunks.
//!
//! Registering a native function must not lose its signature, yet the
//! registry stores every entry in one homogeneous table. Two layers
//! make that work:
//!
//! - **Typed**: [`Procedure<Args>`] is implemented for every
//!   `Fn(A1, .., An) -> R`. It knows how to decode exactly `A1..An`
//!   from a [`Codec`] session, call the function and encode `R`.
//! - **Erased**: [`Thunk<F, Args>`] moves the function together with its
//!   signature marker into one value and erases it to `Box<dyn Invoke<C>>`.
//!
//! The function and the code that knows its signature are built in the same
//! constructor and never separated, so there is no handle that could be
//! re-interpreted with the wrong type.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::codec::Codec;
use crate::error::CallError;

/// A native function callable through the RPC boundary.
///
/// `Args` is the tuple of declared argument types. It only exists to keep
/// the blanket impls for different arities apart.
pub trait Procedure<Args>: 'static {
    /// Decode the arguments, call the function and encode its result.
    ///
    /// Returns the encoded reply; empty when the function returns `()`.
    /// The function is not called unless every argument decoded.
    fn decode_and_call<C: Codec>(&self, codec: &mut C) -> Result<Vec<u8>, CallError>;
}

fn encode_reply<C: Codec, R: Serialize + 'static>(codec: &mut C, ret: &R) -> Result<Vec<u8>, CallError> {
    // A `()` return is "no value": no response bytes, only a flush.
    if TypeId::of::<R>() == TypeId::of::<()>() {
        return Ok(Vec::new());
    }
    Ok(codec.encode(ret)?)
}

macro_rules! impl_procedure {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg,)*> Procedure<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Ret + 'static,
            Ret: Serialize + 'static,
            $($arg: DeserializeOwned,)*
        {
            #[allow(non_snake_case, unused_variables)]
            fn decode_and_call<C: Codec>(&self, codec: &mut C) -> Result<Vec<u8>, CallError> {
                $(let $arg = codec.decode_next::<$arg>()?;)*
                let ret = (self)($($arg),*);
                encode_reply(codec, &ret)
            }
        }
    };
}

impl_procedure!();
impl_procedure!(A1);
impl_procedure!(A1, A2);
impl_procedure!(A1, A2, A3);
impl_procedure!(A1, A2, A3, A4);
impl_procedure!(A1, A2, A3, A4, A5);
impl_procedure!(A1, A2, A3, A4, A5, A6);
impl_procedure!(A1, A2, A3, A4, A5, A6, A7);
impl_procedure!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_procedure!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_procedure!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_procedure!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_procedure!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

/// Object-safe form of [`Procedure`] for one codec type.
pub trait Invoke<C: Codec> {
    fn invoke(&self, codec: &mut C) -> Result<Vec<u8>, CallError>;
}

/// A procedure bundled with its signature marker.
pub struct Thunk<F, Args> {
    procedure: F,
    _signature: PhantomData<fn(Args)>,
}

impl<F, Args> Thunk<F, Args> {
    pub fn new(procedure: F) -> Self {
        Self {
            procedure,
            _signature: PhantomData,
        }
    }
}

impl<C, F, Args> Invoke<C> for Thunk<F, Args>
where
    C: Codec,
    F: Procedure<Args>,
{
    fn invoke(&self, codec: &mut C) -> Result<Vec<u8>, CallError> {
        self.procedure.decode_and_call(codec)
    }
}

/// What running an entry means.
pub enum EntryKind<C> {
    /// A registered native function.
    Native(Box<dyn Invoke<C>>),
    /// The built-in `help` listing, rendered from the registry at call time.
    Help,
}

/// One registry row: how to run it and what it does.
pub struct ProcedureEntry<C> {
    kind: EntryKind<C>,
    description: &'static str,
}

impl<C: Codec> ProcedureEntry<C> {
    /// Erase `procedure` into an entry.
    pub fn native<F, Args>(procedure: F, description: &'static str) -> Self
    where
        F: Procedure<Args>,
        Args: 'static,
    {
        Self {
            kind: EntryKind::Native(Box::new(Thunk::new(procedure))),
            description,
        }
    }

    pub(crate) fn help(description: &'static str) -> Self {
        Self {
            kind: EntryKind::Help,
            description,
        }
    }

    pub fn kind(&self) -> &EntryKind<C> {
        &self.kind
    }

    pub fn description(&self) -> &'static str {
        self.description
    }
}
