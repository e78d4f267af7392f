//! The edge style grammar.
//!
//! An edge style is a short string of arrowhead and segment characters:
//!
//! | Character | Meaning |
//! |-----------|---------|
//! | `>` | arrowhead pointing from start to end |
//! | `<` | arrowhead pointing from end to start |
//! | `-` | solid segment |
//! | `.` | dashed segment |
//! | `=` | double line |
//!
//! Segment characters split the connection into equal slots. Consecutive
//! segments of the same kind merge into one run, even across arrowheads, so
//! `->-` is a single solid line with an arrowhead halfway along it.
//!
//! [`EdgeGrammar::parse`] tokenizes and validates a style up front;
//! [`EdgeGrammar::plan`] interprets the tokens into concrete lines and
//! arrowheads for a resolved connection.

use std::{fmt, str::FromStr};

use netbrush_core::geometry::Point;

use crate::error::ConfigurationError;

/// The kind of line a segment character draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Solid,
    Dashed,
    Double,
}

/// Which way an arrowhead points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKind {
    /// `>`: towards the end point.
    Forward,
    /// `<`: towards the start point.
    Backward,
}

impl ArrowKind {
    /// `1.0` for forward heads, `-1.0` for backward heads.
    pub fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// One character of an edge style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Segment(SegmentKind),
    Arrow(ArrowKind),
}

impl Token {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Segment(SegmentKind::Solid)),
            '.' => Some(Self::Segment(SegmentKind::Dashed)),
            '=' => Some(Self::Segment(SegmentKind::Double)),
            '>' => Some(Self::Arrow(ArrowKind::Forward)),
            '<' => Some(Self::Arrow(ArrowKind::Backward)),
            _ => None,
        }
    }

    fn is_arrow(self) -> bool {
        matches!(self, Self::Arrow(_))
    }
}

/// An arrowhead and the segment slot it sits at.
///
/// Slot `k` is the boundary before the `k`-th segment character, so a
/// leading head has slot 0 and a trailing head has the segment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowPlacement {
    pub kind: ArrowKind,
    pub slot: usize,
}

/// A maximal run of same-kind segment characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRun {
    pub kind: SegmentKind,
    /// Index of the first segment character in the run.
    pub first: usize,
    pub len: usize,
}

/// Arrowhead dimensions in diagram units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadGeometry {
    pub length: f32,
    pub width: f32,
}

/// A straight line to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedLine {
    pub start: Point,
    pub end: Point,
    pub dashed: bool,
}

impl PlannedLine {
    pub fn length(&self) -> f32 {
        self.end.sub_point(self.start).hypot()
    }
}

/// An arrowhead to draw: back edge centered on `base`, tip `length` along
/// the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedArrowHead {
    pub base: Point,
    pub direction: Point,
    pub length: f32,
    pub width: f32,
}

impl PlannedArrowHead {
    pub fn tip(&self) -> Point {
        self.base.add_point(self.direction.scale(self.length))
    }
}

/// Everything an edge draws, in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePlan {
    pub arrow_heads: Vec<PlannedArrowHead>,
    pub lines: Vec<PlannedLine>,
}

/// A validated edge style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeGrammar {
    source: String,
    tokens: Vec<Token>,
}

impl EdgeGrammar {
    /// Tokenizes and validates an edge style.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyGrammar`] for an empty style and
    /// [`ConfigurationError::InvalidGrammarCharacter`] naming the first
    /// character outside the grammar.
    ///
    /// # Examples
    ///
    /// ```
    /// # use netbrush::edge::grammar::EdgeGrammar;
    /// let grammar = EdgeGrammar::parse("->-").unwrap();
    /// assert_eq!(grammar.segment_count(), 2);
    /// assert_eq!(grammar.runs().len(), 1);
    ///
    /// assert!(EdgeGrammar::parse("-#-").is_err());
    /// ```
    pub fn parse(style: &str) -> Result<Self, ConfigurationError> {
        if style.is_empty() {
            return Err(ConfigurationError::EmptyGrammar);
        }

        let tokens = style
            .chars()
            .enumerate()
            .map(|(position, character)| {
                Token::from_char(character).ok_or_else(|| {
                    ConfigurationError::InvalidGrammarCharacter {
                        style: style.to_string(),
                        character,
                        position,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: style.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of segment characters.
    pub fn segment_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| matches!(token, Token::Segment(_)))
            .count()
    }

    pub fn starts_with_arrow(&self) -> bool {
        self.tokens.first().is_some_and(|token| token.is_arrow())
    }

    pub fn ends_with_arrow(&self) -> bool {
        self.tokens.last().is_some_and(|token| token.is_arrow())
    }

    /// Arrowheads with their slots, in style order.
    pub fn arrows(&self) -> Vec<ArrowPlacement> {
        self.interpret().arrows
    }

    /// Segment runs, in style order.
    pub fn runs(&self) -> Vec<SegmentRun> {
        self.interpret().runs
    }

    /// Lays the style out along a resolved connection.
    ///
    /// `start` is the start boundary point, `delta` the vector to the end
    /// boundary point and `unit` its direction.
    pub fn plan(&self, start: Point, delta: Point, unit: Point, head: HeadGeometry) -> EdgePlan {
        let Interpretation { arrows, runs } = self.interpret();
        let segment_count = self.segment_count();

        let head_vector = unit.scale(head.length);
        // Slots are spread over the line minus room for the heads.
        let shrunk = delta.sub_point(head_vector.scale(1.2));
        let slots = segment_count.max(1) as f32;

        let arrow_heads = arrows
            .iter()
            .map(|arrow| {
                let sign = arrow.kind.sign();
                let slot_point = shrunk
                    .scale(arrow.slot as f32 / slots)
                    .add_point(start)
                    .add_point(head_vector.scale(0.6));
                PlannedArrowHead {
                    base: slot_point.sub_point(head_vector.scale(sign * 0.6)),
                    direction: unit.scale(sign),
                    length: head.length,
                    width: head.width,
                }
            })
            .collect();

        if runs.is_empty() {
            return EdgePlan {
                arrow_heads,
                lines: Vec::new(),
            };
        }

        let step = delta.scale(1.0 / segment_count as f32);
        let mut spans: Vec<(SegmentKind, Point, Point)> = runs
            .iter()
            .map(|run| {
                (
                    run.kind,
                    start.add_point(step.scale(run.first as f32)),
                    start.add_point(step.scale((run.first + run.len) as f32)),
                )
            })
            .collect();

        // Keep the line out from under arrowheads at either end.
        if self.ends_with_arrow() {
            if let Some((_, _, end)) = spans.last_mut() {
                *end = end.sub_point(head_vector);
            }
        }
        if self.starts_with_arrow() {
            if let Some((_, line_start, _)) = spans.first_mut() {
                *line_start = line_start.add_point(head_vector);
            }
        }

        let offset = unit.perpendicular().scale(0.4 * head.width);
        let lines = spans
            .into_iter()
            .flat_map(|(kind, line_start, line_end)| match kind {
                SegmentKind::Double => vec![
                    PlannedLine {
                        start: line_start.add_point(offset),
                        end: line_end.add_point(offset),
                        dashed: false,
                    },
                    PlannedLine {
                        start: line_start.sub_point(offset),
                        end: line_end.sub_point(offset),
                        dashed: false,
                    },
                ],
                SegmentKind::Solid | SegmentKind::Dashed => vec![PlannedLine {
                    start: line_start,
                    end: line_end,
                    dashed: kind == SegmentKind::Dashed,
                }],
            })
            .collect();

        EdgePlan { arrow_heads, lines }
    }

    fn interpret(&self) -> Interpretation {
        let mut interpreter = Interpreter::default();
        for token in &self.tokens {
            interpreter.step(*token);
        }
        interpreter.finish()
    }
}

impl FromStr for EdgeGrammar {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EdgeGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

struct Interpretation {
    arrows: Vec<ArrowPlacement>,
    runs: Vec<SegmentRun>,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    /// Inside a run; arrowheads do not end it.
    Run(SegmentRun),
}

/// Walks the tokens, grouping segments into runs and slotting arrowheads.
#[derive(Debug, Default)]
struct Interpreter {
    state: State,
    segments_seen: usize,
    arrows: Vec<ArrowPlacement>,
    runs: Vec<SegmentRun>,
}

impl Interpreter {
    fn step(&mut self, token: Token) {
        match token {
            Token::Arrow(kind) => self.arrows.push(ArrowPlacement {
                kind,
                slot: self.segments_seen,
            }),
            Token::Segment(kind) => {
                self.state = match std::mem::take(&mut self.state) {
                    State::Run(mut run) if run.kind == kind => {
                        run.len += 1;
                        State::Run(run)
                    }
                    previous => {
                        if let State::Run(run) = previous {
                            self.runs.push(run);
                        }
                        State::Run(SegmentRun {
                            kind,
                            first: self.segments_seen,
                            len: 1,
                        })
                    }
                };
                self.segments_seen += 1;
            }
        }
    }

    fn finish(mut self) -> Interpretation {
        if let State::Run(run) = self.state {
            self.runs.push(run);
        }
        Interpretation {
            arrows: self.arrows,
            runs: self.runs,
        }
    }
}
