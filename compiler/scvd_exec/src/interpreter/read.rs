//! `read` and `readlist`.

use scvd_eval::Value;
use scvd_ir::ScalarType;
use tracing::{error, trace, warn};

use super::Pass;
use crate::compiled::CompiledExpr;
use crate::error::ExecError;
use crate::memory::{bytes_to_u64, decode_elements, decode_scalar, Endian, MemoryHost};
use crate::statement::{ReadListStmt, ReadStmt};
use crate::tree::NodeId;

impl<M: MemoryHost> Pass<'_, M> {
    pub(super) async fn read(
        &mut self,
        id: NodeId,
        read: &ReadStmt,
        line: u32,
    ) -> Result<(), ExecError> {
        if read.is_const && self.const_done.contains(&id) {
            return Ok(());
        }
        let Some(address) = self
            .start_address(read.symbol.as_deref(), read.offset.as_ref(), read.based, line)
            .await?
        else {
            return Ok(());
        };

        let requested = match &read.size {
            Some(size) => self.eval_i64(size, line).await?.unwrap_or(1),
            None => 1,
        };
        let count = clamp_logged(
            requested,
            u64::from(self.config.max_read_elements),
            "read size",
            line,
        );
        let count = self.fit_read(count, read.ty, line);
        let Some(bytes) = self
            .read_memory(address, count * u64::from(read.ty.size()), line)
            .await
        else {
            return Ok(());
        };

        let mut values = decode_elements(&bytes, read.ty, read.endian);
        if count == 1 {
            self.store(&read.name, values.pop().unwrap_or(Value::Undefined), line);
        } else {
            self.store_array(&read.name, values, line);
        }
        if read.is_const {
            self.const_done.insert(id);
        }
        Ok(())
    }

    pub(super) async fn read_list(
        &mut self,
        id: NodeId,
        list: &ReadListStmt,
        line: u32,
    ) -> Result<(), ExecError> {
        if list.is_const && self.const_done.contains(&id) {
            return Ok(());
        }
        let Some(start) = self
            .start_address(list.symbol.as_deref(), list.offset.as_ref(), list.based, line)
            .await?
        else {
            return Ok(());
        };

        let max = u64::from(self.config.max_readlist_count);
        let count = match &list.count {
            Some(count) => {
                let requested = self.eval_i64(count, line).await?.unwrap_or(1);
                clamp_logged(requested, max, "readlist count", line)
            }
            // Linked lists run until a null pointer.
            None if list.next.is_some() => max,
            None => 1,
        };

        let values = match &list.next {
            Some(next) => {
                let Some(next_offset) = self.eval_i64(next, line).await? else {
                    return Ok(());
                };
                self.follow_links(start, next_offset, count, list.ty, list.endian, line)
                    .await
            }
            None => {
                let count = self.fit_read(count, list.ty, line);
                match self
                    .read_memory(start, count * u64::from(list.ty.size()), line)
                    .await
                {
                    Some(bytes) => decode_elements(&bytes, list.ty, list.endian),
                    None => return Ok(()),
                }
            }
        };

        trace!(line, elements = values.len(), "readlist");
        self.store_array(&list.name, values, line);
        if list.is_const {
            self.const_done.insert(id);
        }
        Ok(())
    }

    async fn follow_links(
        &mut self,
        start: u64,
        next_offset: i64,
        count: u64,
        ty: ScalarType,
        endian: Endian,
        line: u32,
    ) -> Vec<Value> {
        let width = u64::from(ty.size());
        let mut values = Vec::new();
        let mut address = start;
        while address != 0 && (values.len() as u64) < count {
            let Some(bytes) = self.read_memory(address, width, line).await else {
                break;
            };
            values.push(decode_scalar(&bytes, ty, endian));
            let Some(next) = self
                .read_pointer(address.wrapping_add(next_offset as u64), line)
                .await
            else {
                break;
            };
            address = next;
        }
        if address != 0 && values.len() as u64 == count {
            error!(line, count, "readlist stopped at the element cap");
        }
        values
    }

    /// `symbol` address plus `offset`, dereferenced once when `based`.
    async fn start_address(
        &mut self,
        symbol: Option<&str>,
        offset: Option<&CompiledExpr>,
        based: bool,
        line: u32,
    ) -> Result<Option<u64>, ExecError> {
        let base = match symbol {
            Some(symbol) => match self.ctx.host().memory().symbol_address(symbol) {
                Some(address) => address,
                None => {
                    warn!(line, symbol, "symbol has no address");
                    return Ok(None);
                }
            },
            None => 0,
        };
        let offset = match offset {
            Some(offset) => match self.eval_i64(offset, line).await? {
                Some(offset) => offset,
                None => return Ok(None),
            },
            None => 0,
        };
        let address = base.wrapping_add(offset as u64);
        if !based {
            return Ok(Some(address));
        }
        Ok(self.read_pointer(address, line).await)
    }

    /// One target pointer, in target byte order.
    async fn read_pointer(&mut self, address: u64, line: u32) -> Option<u64> {
        let size = if self.config.pointer_size == 8 { 8 } else { 4 };
        let bytes = self.read_memory(address, size, line).await?;
        Some(bytes_to_u64(&bytes, self.config.pointer_endian))
    }

    /// Read `size` bytes, clamped to the configured maximum.
    async fn read_memory(&mut self, address: u64, size: u64, line: u32) -> Option<Vec<u8>> {
        let size = clamp_logged(
            i64::try_from(size).unwrap_or(i64::MAX),
            u64::from(self.config.max_read_bytes),
            "memory read",
            line,
        );
        let bytes = self
            .ctx
            .host_mut()
            .memory_mut()
            .read(address, size as usize)
            .await;
        if bytes.is_none() {
            warn!(line, address, size, "memory read failed");
        }
        bytes
    }

    /// Shrink `count` so one read stays within the byte limit.
    fn fit_read(&self, count: u64, ty: ScalarType, line: u32) -> u64 {
        let width = u64::from(ty.size());
        let max = (u64::from(self.config.max_read_bytes) / width).max(1);
        if count > max {
            error!(line, count, max, "read exceeds the byte limit, clamped");
            return max;
        }
        count
    }

    fn store(&mut self, name: &str, value: Value, line: u32) {
        if name.is_empty() {
            warn!(line, "read without a name, result dropped");
            return;
        }
        self.ctx.host_mut().symbols_mut().set(name, value);
    }

    fn store_array(&mut self, name: &str, values: Vec<Value>, line: u32) {
        if name.is_empty() {
            warn!(line, "read without a name, result dropped");
            return;
        }
        self.ctx.host_mut().symbols_mut().set_array(name, values);
    }
}

/// Clamp to `[1, max]`, logging when the value was out of range.
fn clamp_logged(value: i64, max: u64, what: &'static str, line: u32) -> u64 {
    let clamped = if value < 1 {
        1
    } else {
        (value as u64).min(max.max(1))
    };
    if clamped as i64 != value {
        error!(line, what, requested = value, clamped, "out of range, clamped");
    }
    clamped
}
