//! Tetrad chords and the enumeration of a whole chord space.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::complexity::Complexity;
use crate::fraction::Fraction;
use crate::limit::Limit;
use crate::math;

/// A four-voice chord given as an integer frequency ratio `i:j:k:l`.
///
/// Members are listed from the lowest voice upwards and must be positive.
/// The members are *not* reduced on construction since the shared factor
/// carries voicing information (`2:3:4:5` and `4:6:8:10` name the same pitch
/// classes but the enumerator only ever emits the reduced form).
///
/// # Examples
///
/// ```
/// # use tetrad::chord::Chord;
/// let chord = "4:5:6:7".parse::<Chord>().unwrap();
/// assert_eq!(chord.members(), [4, 5, 6, 7]);
/// assert_eq!(chord.to_string(), "4:5:6:7");
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Chord {
    members: [u32; 4],
}

impl Chord {
    /// Creates a chord from its members. Returns `None` if any member is zero.
    pub fn new(members: [u32; 4]) -> Option<Self> {
        if members.contains(&0) {
            return None;
        }
        Some(Self { members })
    }

    pub fn members(self) -> [u32; 4] {
        self.members
    }

    /// Returns the three intervals between adjacent voices, from the bottom
    /// up, in lowest terms.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tetrad::chord::Chord;
    /// # use tetrad::fraction::Fraction;
    /// let chord = "4:5:6:8".parse::<Chord>().unwrap();
    /// assert_eq!(
    ///     chord.intervals(),
    ///     [Fraction::new(5, 4), Fraction::new(6, 5), Fraction::new(4, 3)]
    /// );
    /// ```
    pub fn intervals(self) -> [Fraction; 3] {
        let [i, j, k, l] = self.members.map(u64::from);
        [
            Fraction::new(j, i),
            Fraction::new(k, j),
            Fraction::new(l, k),
        ]
    }

    /// Returns the denominator of the chord's virtual fundamental.
    ///
    /// Each member is expressed as a fraction over the lowest voice. The
    /// result is the least common multiple of those fractions' denominators
    /// and tells how far below the lowest voice the implied fundamental sits.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tetrad::chord::Chord;
    /// let otonal = "4:5:6:7".parse::<Chord>().unwrap();
    /// assert_eq!(otonal.virtual_fundamental_denominator(), 4);
    ///
    /// let rooted = "1:2:3:4".parse::<Chord>().unwrap();
    /// assert_eq!(rooted.virtual_fundamental_denominator(), 1);
    /// ```
    pub fn virtual_fundamental_denominator(self) -> u64 {
        let lowest = u64::from(self.members[0]);
        self.members
            .iter()
            .map(|&member| Fraction::new(u64::from(member), lowest).denom())
            .fold(1, math::lcm_u64)
    }
}

/// [`Chord`]s are rendered as colon-separated members.
impl Display for Chord {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let [i, j, k, l] = self.members;
        write!(f, "{i}:{j}:{k}:{l}")
    }
}

/// [`Chord`]s parse from `i:j:k:l` labels.
///
/// ```
/// # use tetrad::chord::Chord;
/// assert!("4:5:6:7".parse::<Chord>().is_ok());
/// assert!("4:5:6".parse::<Chord>().is_err()); // three members
/// assert!("4:0:6:7".parse::<Chord>().is_err()); // zero member
/// assert!("4:5:x:7".parse::<Chord>().is_err());
/// ```
impl FromStr for Chord {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(':').collect::<Vec<_>>();
        if parts.len() != 4 {
            return Err(ChordParseError::WrongNumberOfMembers(parts.len()));
        }
        let mut members = [0; 4];
        for (member, part) in members.iter_mut().zip(&parts) {
            *member = part
                .trim()
                .parse::<u32>()
                .map_err(|_| ChordParseError::InvalidMember((*part).to_owned()))?;
        }
        Chord::new(members).ok_or(ChordParseError::ZeroMember)
    }
}

/// Error reported when a chord label cannot be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChordParseError {
    /// The label did not have exactly four colon-separated members.
    WrongNumberOfMembers(usize),

    /// A member was not a number.
    InvalidMember(String),

    /// A member was zero.
    ZeroMember,
}

impl Display for ChordParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ChordParseError::WrongNumberOfMembers(count) => {
                write!(f, "Expected 4 chord members but found {count}")
            }
            ChordParseError::InvalidMember(member) => {
                write!(f, "Invalid chord member '{member}': Must be a positive integer")
            }
            ChordParseError::ZeroMember => write!(f, "Chord members must not be zero"),
        }
    }
}

/// A restriction on the virtual-fundamental denominators of enumerated chords.
///
/// Parses from either a dot-separated list of admitted values (`"4.8"`) or an
/// inclusive range (`"2...8"`).
///
/// # Examples
///
/// ```
/// # use tetrad::chord::VirtualFundamentalFilter;
/// let range = "2...8".parse::<VirtualFundamentalFilter>().unwrap();
/// assert!(range.admits(2));
/// assert!(range.admits(8));
/// assert!(!range.admits(9));
///
/// let values = "1.4".parse::<VirtualFundamentalFilter>().unwrap();
/// assert!(values.admits(4));
/// assert!(!values.admits(2));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VirtualFundamentalFilter {
    Values(Vec<u64>),
    Range(u64, u64),
}

impl VirtualFundamentalFilter {
    pub fn admits(&self, denominator: u64) -> bool {
        match self {
            VirtualFundamentalFilter::Values(values) => values.contains(&denominator),
            VirtualFundamentalFilter::Range(low, high) => {
                (*low..=*high).contains(&denominator)
            }
        }
    }
}

impl FromStr for VirtualFundamentalFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_bound = |bound: &str| {
            bound
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("Invalid number '{bound}': Must be a positive integer"))
        };

        if let Some((low, high)) = s.split_once("...") {
            let (low, high) = (parse_bound(low)?, parse_bound(high)?);
            if low > high {
                return Err(format!("Invalid range '{s}': Bounds must be ascending"));
            }
            return Ok(VirtualFundamentalFilter::Range(low, high));
        }

        let values = s
            .split('.')
            .map(parse_bound)
            .collect::<Result<Vec<_>, _>>()?;
        if values.is_empty() {
            return Err("Empty virtual fundamental filter".to_owned());
        }
        Ok(VirtualFundamentalFilter::Values(values))
    }
}

/// The full parameter set of a chord-space enumeration.
///
/// `enumerate` walks all non-decreasing 4-tuples over the limit's candidate
/// numbers, applies the structural filters and scores the survivors. The
/// output order is deterministic: lexicographic in the chord members.
///
/// # Examples
///
/// ```
/// # use tetrad::chord::ChordSpace;
/// # use tetrad::complexity::Complexity;
/// # use tetrad::limit::Limit;
/// let space = ChordSpace {
///     limit: Limit::integer(6),
///     equave_ratio: 2.0,
///     complexity: Complexity::Tenney,
///     hide_unison_voices: true,
///     omit_octaves: false,
///     virtual_fundamental_filter: None,
/// };
/// let points = space.enumerate();
/// assert!(points
///     .iter()
///     .any(|point| point.chord.to_string() == "3:4:5:6"));
/// ```
#[derive(Clone, Debug)]
pub struct ChordSpace {
    pub limit: Limit,
    pub equave_ratio: f64,
    pub complexity: Complexity,
    pub hide_unison_voices: bool,
    pub omit_octaves: bool,
    pub virtual_fundamental_filter: Option<VirtualFundamentalFilter>,
}

/// One enumerated chord with its location and score.
///
/// `cents` holds the logarithmic sizes of the three adjacent-voice intervals
/// and locates the chord in the visualization tetrahedron.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChordPoint {
    pub chord: Chord,
    pub cents: [f64; 3],
    pub complexity: f64,
}

impl ChordSpace {
    pub fn enumerate(&self) -> Vec<ChordPoint> {
        let candidates = self.limit.candidate_numbers(self.equave_ratio);
        let mut points = vec![];
        for combo in CombinationsWithRepetition::new(&candidates) {
            if let Some(point) = self.evaluate(combo) {
                points.push(point);
            }
        }
        points
    }

    fn evaluate(&self, members: [u32; 4]) -> Option<ChordPoint> {
        if self.hide_unison_voices && has_repeated_member(members) {
            return None;
        }
        if self.omit_octaves && has_internal_octave(members) {
            return None;
        }
        if f64::from(members[3]) / f64::from(members[0]) > self.equave_ratio {
            return None;
        }
        let gcd = members
            .map(u64::from)
            .into_iter()
            .fold(0, math::gcd_u64);
        if gcd != 1 {
            return None;
        }

        let chord = Chord::new(members)?;

        if let Some(filter) = &self.virtual_fundamental_filter {
            if !filter.admits(chord.virtual_fundamental_denominator()) {
                return None;
            }
        }

        let intervals = chord.intervals();
        if intervals
            .iter()
            .any(|&interval| !self.limit.allows(interval))
        {
            return None;
        }

        let cents = intervals.map(Fraction::as_cents);
        let complexity = intervals
            .iter()
            .map(|&interval| self.complexity.rate(interval))
            .fold(f64::NEG_INFINITY, f64::max);

        Some(ChordPoint {
            chord,
            cents,
            complexity,
        })
    }
}

fn has_repeated_member(members: [u32; 4]) -> bool {
    // Members arrive sorted, so duplicates are adjacent.
    members.windows(2).any(|pair| pair[0] == pair[1])
}

fn has_internal_octave(members: [u32; 4]) -> bool {
    const TOLERANCE: f64 = 1e-9;
    for (index, &low) in members.iter().enumerate() {
        for &high in &members[index + 1..] {
            let ratio = f64::from(high) / f64::from(low);
            if ratio > 1.0 {
                let octaves = ratio.log2();
                if (octaves - octaves.round()).abs() < TOLERANCE {
                    return true;
                }
            }
        }
    }
    false
}

/// Iterator over all non-decreasing 4-tuples drawn from a sorted slice.
struct CombinationsWithRepetition<'a> {
    candidates: &'a [u32],
    indices: [usize; 4],
    exhausted: bool,
}

impl<'a> CombinationsWithRepetition<'a> {
    fn new(candidates: &'a [u32]) -> Self {
        Self {
            candidates,
            indices: [0; 4],
            exhausted: candidates.is_empty(),
        }
    }
}

impl Iterator for CombinationsWithRepetition<'_> {
    type Item = [u32; 4];

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let combo = self.indices.map(|index| self.candidates[index]);

        // Advance the rightmost index that can still grow and reset the
        // indices to its right to the same position.
        let mut position = self.indices.len();
        loop {
            if position == 0 {
                self.exhausted = true;
                break;
            }
            position -= 1;
            if self.indices[position] + 1 < self.candidates.len() {
                let next_index = self.indices[position] + 1;
                for index in &mut self.indices[position..] {
                    *index = next_index;
                }
                break;
            }
        }

        Some(combo)
    }
}
