//! Assignable locations.

use std::future::Future;
use std::pin::Pin;

use scvd_ir::{ExprArena, ExprId, ExprKind};

use super::eval::is_colon_path;
use super::EvalContext;
use crate::errors::{invalid_target, write_rejected, EvalError, EvalResult};
use crate::host::EvalHost;
use crate::{ContainerRef, Key, Value};

/// Where an assignment or update writes.
#[derive(Clone, Debug)]
pub(crate) enum Place {
    Symbol(String),
    Key { container: ContainerRef, key: Key },
}

type PlaceFuture<'s> = Pin<Box<dyn Future<Output = Result<Place, EvalError>> + 's>>;

impl<H: EvalHost> EvalContext<H> {
    /// Resolve an lvalue. Member and index bases that do not hold a
    /// container get a fresh one: an array for an index key, an object
    /// otherwise.
    pub(crate) fn resolve_place<'s>(&'s mut self, arena: &'s ExprArena, id: ExprId) -> PlaceFuture<'s> {
        Box::pin(async move {
            match arena.kind(id) {
                ExprKind::Ident(name) if !is_colon_path(name) => Ok(Place::Symbol(name.clone())),
                ExprKind::Member { base, name } => {
                    let key = Key::Name(name.clone());
                    let container = self.container_at(arena, *base, &key).await?;
                    Ok(Place::Key { container, key })
                }
                ExprKind::Index { base, index } => {
                    let key = Key::from_value(&self.eval(arena, *index).await?);
                    let container = self.container_at(arena, *base, &key).await?;
                    Ok(Place::Key { container, key })
                }
                _ => Err(invalid_target()),
            }
        })
    }

    async fn container_at(
        &mut self,
        arena: &ExprArena,
        base: ExprId,
        key: &Key,
    ) -> Result<ContainerRef, EvalError> {
        let place = self.resolve_place(arena, base).await?;
        let current = match &place {
            Place::Symbol(name) => self.host.read_symbol(self.container, name),
            Place::Key { container, key } => self.host.read_key(*container, key),
        };
        if let Some(Value::Container(existing)) = current {
            return Ok(existing);
        }
        let created = if key.is_index() {
            self.host.new_array()
        } else {
            self.host.new_object()
        };
        self.set_place(&place, Value::Container(created))?;
        Ok(created)
    }

    pub(crate) fn get_place(&mut self, place: &Place) -> EvalResult {
        match place {
            Place::Symbol(name) => self.read_name(name),
            Place::Key { container, key } => Ok(self
                .host
                .read_key(*container, key)
                .unwrap_or(Value::Undefined)),
        }
    }

    pub(crate) fn set_place(&mut self, place: &Place, value: Value) -> Result<(), EvalError> {
        let written = match place {
            Place::Symbol(name) => self.host.write_symbol(self.container, name, value),
            Place::Key { container, key } => self.host.write_key(*container, key.clone(), value),
        };
        if written {
            Ok(())
        } else {
            Err(write_rejected(match place {
                Place::Symbol(name) => name.clone(),
                Place::Key { key, .. } => key.to_string(),
            }))
        }
    }
}
