//! Epoch-level monitors on the training loss.

/// Tracks the best loss seen so far for save-best-only checkpointing.
pub struct BestLoss {
    best: f32,
}

impl BestLoss {
    pub fn new() -> Self {
        Self { best: f32::INFINITY }
    }

    /// Returns true on strict improvement and records the new best.
    pub fn observe(&mut self, loss: f32) -> bool {
        if loss < self.best {
            self.best = loss;
            true
        } else {
            false
        }
    }

    pub fn best(&self) -> f32 {
        self.best
    }
}

impl Default for BestLoss {
    fn default() -> Self {
        Self::new()
    }
}

/// Multiplies the learning rate by `factor` after `patience` consecutive
/// epochs without loss improvement, then resets its wait counter.
pub struct ReduceLrOnPlateau {
    factor: f64,
    patience: usize,
    best: f32,
    wait: usize,
}

impl ReduceLrOnPlateau {
    pub fn new(factor: f64, patience: usize) -> Self {
        Self {
            factor,
            patience: patience.max(1),
            best: f32::INFINITY,
            wait: 0,
        }
    }

    /// Feed one epoch's loss; returns the learning rate for the next epoch.
    pub fn observe(&mut self, loss: f32, lr: f64) -> f64 {
        if loss < self.best {
            self.best = loss;
            self.wait = 0;
            return lr;
        }
        self.wait += 1;
        if self.wait >= self.patience {
            self.wait = 0;
            lr * self.factor
        } else {
            lr
        }
    }
}
