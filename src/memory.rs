//! # Memory Bus
//!
//! The `MemoryBus` trait decouples the CPU from the memory behind it, which
//! lets tests run against plain RAM while the emulator binary runs against
//! the memory-mapped I/O configuration.
//!
//! Two implementations are provided:
//!
//! - [`FlatMemory`]: 64 KiB of plain RAM.
//! - [`IoMemory`]: the same 64 KiB with the `[0xF000, 0xFFFF]` window routed
//!   through the I/O dispatch (display at `0xF001`, keyboard at `0xF004`).
//!
//! Matching 6502 hardware, there is no bus error mechanism: every address is
//! readable and writable and no operation can fail.

use std::cell::RefCell;

/// Display output register. Bytes stored here are fed to the display sink.
pub const DISPLAY_ADDR: u16 = 0xF001;

/// Keyboard input register. Reads are answered by the keyboard hook.
pub const KEYBOARD_ADDR: u16 = 0xF004;

/// First address of the memory-mapped I/O window.
pub const IO_WINDOW_START: u16 = 0xF000;

/// Byte-addressed memory as seen by the CPU.
pub trait MemoryBus {
    /// Reads the byte at `addr`. Must never fail; unmapped regions simply
    /// read back whatever was last stored there.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to `addr`. Must never fail; read-only or intercepted
    /// regions may ignore or reroute the value.
    fn write(&mut self, addr: u16, value: u8);

    /// Reads a little-endian 16-bit word starting at `addr`.
    fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Writes a little-endian 16-bit word starting at `addr`.
    fn write_word(&mut self, addr: u16, value: u16) {
        self.write(addr, (value & 0xFF) as u8);
        self.write(addr.wrapping_add(1), (value >> 8) as u8);
    }
}

/// Plain 64 KiB RAM covering the full address space, initialized to zero.
///
/// This is the memory used by most tests: no I/O dispatch, every write
/// lands in the array.
pub struct FlatMemory {
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}

/// 64 KiB RAM with the `[0xF000, 0xFFFF]` window routed through the I/O
/// dispatch.
///
/// Inside the window only two addresses are special:
///
/// - Writes to [`DISPLAY_ADDR`] are filtered and forwarded to the display
///   sink: printable ASCII (`0x20..=0x7E`) passes through unchanged, CR and
///   LF are both delivered as `\n`, everything else is dropped.
/// - Reads from [`KEYBOARD_ADDR`] are answered by the keyboard hook, or
///   `0x00` when none is installed.
///
/// All other addresses in the window behave as RAM, which is what lets the
/// reset/IRQ/NMI vectors at `0xFFFA..=0xFFFF` live there.
///
/// Both hooks are plain closures so that front-ends can wire the display to
/// stdout while tests capture the traffic in a buffer:
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use mos6502::{IoMemory, MemoryBus};
///
/// let captured = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&captured);
///
/// let mut memory = IoMemory::new();
/// memory.set_display(move |byte| sink.borrow_mut().push(byte));
///
/// memory.write(0xF001, b'A');
/// memory.write(0xF001, 0x07); // bell: not printable, dropped
/// memory.write(0xF001, 0x0D); // CR folds to newline
///
/// assert_eq!(*captured.borrow(), b"A\n");
/// ```
pub struct IoMemory {
    data: Box<[u8; 65536]>,
    on_display: Option<Box<dyn FnMut(u8)>>,
    // Keyboard reads happen through `&self`, so the hook sits behind a
    // RefCell to keep the MemoryBus read signature shared-reference.
    on_keyboard: RefCell<Option<Box<dyn FnMut() -> u8>>>,
}

impl IoMemory {
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
            on_display: None,
            on_keyboard: RefCell::new(None),
        }
    }

    /// Installs the display sink. The callback receives already-filtered
    /// bytes: printable ASCII verbatim, line endings folded to `\n`.
    pub fn set_display<F: FnMut(u8) + 'static>(&mut self, sink: F) {
        self.on_display = Some(Box::new(sink));
    }

    /// Installs the keyboard hook answering reads of [`KEYBOARD_ADDR`].
    pub fn set_keyboard<F: FnMut() -> u8 + 'static>(&mut self, hook: F) {
        *self.on_keyboard.borrow_mut() = Some(Box::new(hook));
    }

    fn display_write(&mut self, value: u8) {
        let forwarded = match value {
            0x20..=0x7E => Some(value),
            0x0A | 0x0D => Some(b'\n'),
            _ => None,
        };
        if let (Some(byte), Some(sink)) = (forwarded, self.on_display.as_mut()) {
            sink(byte);
        }
    }

    fn keyboard_read(&self) -> u8 {
        match self.on_keyboard.borrow_mut().as_mut() {
            Some(hook) => hook(),
            None => 0x00,
        }
    }
}

impl Default for IoMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for IoMemory {
    fn read(&self, addr: u16) -> u8 {
        if addr >= IO_WINDOW_START {
            // Only the keyboard register is intercepted; the rest of the
            // window (vectors included) reads through to RAM.
            if addr == KEYBOARD_ADDR {
                return self.keyboard_read();
            }
        }
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        if addr >= IO_WINDOW_START {
            if addr == DISPLAY_ADDR {
                self.display_write(value);
                return;
            }
        }
        self.data[addr as usize] = value;
    }
}
