//! Single-timeline simulation kernel.
//!
//! A [`Simulator`] owns the circuit under test and a free-running clock. Test code and the clock
//! generator are polled together by [`Simulator::run`] on one task; test code suspends at
//! [`Simulator::clock_cycles`] and the clock makes progress in between. The test future is always
//! polled first, so anything driven before an await is visible to the next clock edge.

use std::cell::{Cell, RefCell};
use std::future::Future;

use eyre::{eyre, Result};
use tokio::sync::Notify;

use crate::pins::TinyTapeoutPins;

/// Output pins sampled together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinOutputs {
    pub uo_out: u8,
    pub uio_out: u8,
    pub uio_oe: u8,
}

pub struct Simulator<D> {
    dut: RefCell<D>,
    half_period_ps: u64,
    now_ps: Cell<u64>,
    rising_edges: Cell<u64>,
    edge: Notify,
}

impl<D: TinyTapeoutPins> Simulator<D> {
    pub fn new(dut: D, clock_period_ns: u64) -> Self {
        Self {
            dut: RefCell::new(dut),
            half_period_ps: clock_period_ns.saturating_mul(1_000) / 2,
            now_ps: Cell::new(0),
            rising_edges: Cell::new(0),
            edge: Notify::new(),
        }
    }

    /// Poke input pins. The change is evaluated on the next clock phase.
    pub fn drive(&self, poke: impl FnOnce(&mut D)) {
        poke(&mut *self.dut.borrow_mut());
    }

    pub fn outputs(&self) -> PinOutputs {
        let dut = self.dut.borrow();
        PinOutputs {
            uo_out: dut.uo_out(),
            uio_out: dut.uio_out(),
            uio_oe: dut.uio_oe(),
        }
    }

    pub fn now_ns(&self) -> u64 {
        self.now_ps.get() / 1_000
    }

    /// Rising edges processed so far.
    pub fn cycles(&self) -> u64 {
        self.rising_edges.get()
    }

    /// Suspend until `cycles` more rising edges have been evaluated.
    pub async fn clock_cycles(&self, cycles: u64) {
        let target = self.rising_edges.get() + cycles;
        while self.rising_edges.get() < target {
            self.edge.notified().await;
        }
    }

    /// Run `test` with the clock running alongside it.
    pub async fn run<T>(&self, test: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            result = test => result,
            _ = self.generate_clock() => Err(eyre!("clock generator stopped")),
        }
    }

    pub fn into_dut(self) -> D {
        self.dut.into_inner()
    }

    async fn generate_clock(&self) {
        loop {
            self.phase(0);
            tokio::task::yield_now().await;

            self.phase(1);
            self.rising_edges.set(self.rising_edges.get() + 1);
            self.edge.notify_waiters();
            tokio::task::yield_now().await;
        }
    }

    fn phase(&self, level: u8) {
        {
            let mut dut = self.dut.borrow_mut();
            dut.set_clk(level);
            dut.settle();
        }
        self.now_ps.set(self.now_ps.get() + self.half_period_ps);
    }
}
