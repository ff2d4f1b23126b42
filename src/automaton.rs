use byte_set::ByteSet;
use fst::Automaton;

/// Number of bytes in the UTF-8 sequence `lead` starts, or `None` for a
/// continuation byte or an invalid lead.
fn sequence_width(lead: u8) -> Option<u8> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc0..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf7 => Some(4),
        _ => None,
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xc0 == 0x80
}

/// What one character position of a [`SlotPattern`] accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Any single character.
    Any,
    /// One of these single-byte characters.
    OneOf(ByteSet),
    /// Exactly this character.
    Char(char),
}

/// A fixed-length query over characters, one [`Slot`] per position.
///
/// Keys are walked byte by byte; the state is the next slot together with the
/// continuation bytes still owed by the character in the previous slot.
pub struct SlotPattern<'a> {
    slots: &'a [Slot],
}

impl<'a> SlotPattern<'a> {
    pub fn new(slots: &'a [Slot]) -> Self {
        Self { slots }
    }
}

impl<'a> Automaton for SlotPattern<'a> {
    type State = Option<(usize, u8)>;

    #[inline(always)]
    fn start(&self) -> Self::State {
        Some((0, 0))
    }

    #[inline(always)]
    fn is_match(&self, state: &Self::State) -> bool {
        *state == Some((self.slots.len(), 0))
    }

    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        let (pos, owed) = (*state)?;

        if owed > 0 {
            // inside a multi-byte character that started in slot pos - 1
            if !is_continuation(byte) {
                return None;
            }
            if let Slot::Char(expected) = self.slots[pos - 1] {
                let mut buf = [0u8; 4];
                let encoded = expected.encode_utf8(&mut buf).as_bytes();
                if encoded[encoded.len() - owed as usize] != byte {
                    return None;
                }
            }
            return Some((pos, owed - 1));
        }

        let width = sequence_width(byte)?;
        let allowed = match self.slots.get(pos)? {
            Slot::Any => true,
            Slot::OneOf(set) => width == 1 && set.contains(byte),
            Slot::Char(expected) => {
                let mut buf = [0u8; 4];
                expected.encode_utf8(&mut buf).as_bytes()[0] == byte
            }
        };
        if allowed {
            Some((pos + 1, width - 1))
        } else {
            None
        }
    }

    #[inline(always)]
    fn can_match(&self, state: &Self::State) -> bool {
        state.is_some()
    }
}

/// Turns a textual pattern into slots: `wildcard` becomes [`Slot::Any`] and
/// every other character pins itself.
pub fn slots_from_pattern(pattern: &str, wildcard: char) -> Vec<Slot> {
    pattern
        .chars()
        .map(|char| {
            if char == wildcard {
                Slot::Any
            } else {
                Slot::Char(char)
            }
        })
        .collect()
}

/// Matches every key of exactly `size` characters.
pub struct Length {
    size: usize,
}

impl Length {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Automaton for Length {
    type State = Option<(usize, u8)>;

    #[inline(always)]
    fn start(&self) -> Self::State {
        Some((0, 0))
    }

    #[inline(always)]
    fn is_match(&self, state: &Self::State) -> bool {
        Some((self.size, 0)) == *state
    }

    #[inline(always)]
    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        let (pos, owed) = (*state)?;
        if owed > 0 {
            return Some((pos, owed - 1)).filter(|_| is_continuation(byte));
        }
        let width = sequence_width(byte)?;
        Some((pos + 1, width - 1)).filter(|(pos, _)| *pos <= self.size)
    }

    #[inline(always)]
    fn can_match(&self, state: &Self::State) -> bool {
        state.is_some()
    }
}
