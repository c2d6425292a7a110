/// Number of slots in a one-time-passcode.
pub const OTP_LEN: usize = 6;

/// Fixed-length one-time-passcode input buffer.
///
/// Pure local input-state management: every mutation either applies fully or
/// is rejected silently, and the only side effect is the returned focus hint
/// (the slot index the caller should move the cursor to, if any).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtpBuffer {
    slots: [Option<char>; OTP_LEN],
}

impl OtpBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type into one slot. An empty `raw` clears the slot; a single decimal
    /// digit fills it and, when there is a next slot, asks for focus there.
    /// Anything else is rejected without touching the buffer.
    pub fn set_digit(&mut self, index: usize, raw: &str) -> Option<usize> {
        if index >= OTP_LEN {
            return None;
        }
        if raw.is_empty() {
            self.slots[index] = None;
            return None;
        }

        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => {
                self.slots[index] = Some(c);
                if index < OTP_LEN - 1 {
                    Some(index + 1)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Backspace pressed in slot `index`. Only signals a focus move when the
    /// slot is already empty and there is a previous slot; clearing a
    /// populated slot is a plain input-clear handled by [`set_digit`].
    pub fn backspace(&self, index: usize) -> Option<usize> {
        if index < OTP_LEN && index > 0 && self.slots[index].is_none() {
            Some(index - 1)
        } else {
            None
        }
    }

    /// Paste clipboard text. Considers the first [`OTP_LEN`] characters; if
    /// any of them is a non-digit the entire paste is rejected and the buffer
    /// is unchanged. On acceptance slots fill left-to-right (later slots keep
    /// their prior contents) and focus goes to `min(pasted_len, OTP_LEN - 1)`.
    pub fn paste(&mut self, raw: &str) -> Option<usize> {
        let pasted: Vec<char> = raw.chars().take(OTP_LEN).collect();
        if pasted.iter().any(|c| !c.is_ascii_digit()) {
            return None;
        }

        for (i, c) in pasted.iter().enumerate() {
            self.slots[i] = Some(*c);
        }
        Some(pasted.len().min(OTP_LEN - 1))
    }

    /// Concatenation of the filled slots in order; only a complete code when
    /// [`is_complete`] holds.
    pub fn value(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn clear(&mut self) {
        self.slots = [None; OTP_LEN];
    }
}
