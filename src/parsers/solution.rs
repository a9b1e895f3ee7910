//! Reader for the single-route solution text format.
//!
//! ```text
//! Details of the solution:
//! route 0, node_num 5, cost 98.20, nodes: 0(60.63, 60.63) 4 17(12.00, 60.63) 9 0
//! vehicle (route) number: 1
//! Total cost: 1098.20
//! ```
//!
//! Visits are separated by whitespace; a visit is a node ID optionally
//! followed by `(arrival_charge, departure_charge)`.

use std::iter::Peekable;
use std::str::CharIndices;

use tracing::debug;

use crate::error::ParseError;
use crate::models::{Route, Solution, Visit};

const DETAILS_PREFIX: &str = "Details of the solution";
const VEHICLE_PREFIX: &str = "vehicle (route) number:";
const TOTAL_PREFIX: &str = "Total cost:";

/// Parses a solution from its text form.
///
/// # Errors
///
/// Returns [`ParseError`] when the details header, route line or total cost
/// trailer is missing or malformed.
///
/// # Examples
///
/// ```
/// use u_evrp::parsers::parse_solution;
///
/// let text = "\
/// Details of the solution:
/// route 0, node_num 3, cost 10.00, nodes: 0(50.00, 50.00) 1 0
/// Total cost: 1010.00
/// ";
/// let sol = parse_solution(text).unwrap();
/// assert_eq!(sol.route().node_ids(), vec![0, 1, 0]);
/// assert_eq!(sol.route().visits()[0].reported_departure_charge, Some(50.0));
/// assert_eq!(sol.reported_total_cost(), Some(1010.0));
/// ```
pub fn parse_solution(text: &str) -> Result<Solution, ParseError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(ParseError::TooShort(lines.len()));
    }
    if !lines[0].1.starts_with(DETAILS_PREFIX) {
        return Err(ParseError::MissingLine(DETAILS_PREFIX));
    }

    let (route_line_no, route_line) = lines[1];
    let header = parse_route_header(route_line_no, route_line)?;
    let route = parse_route_sequence(header.sequence)?;

    let mut solution = Solution::new(route, header.cost)
        .with_route_id(header.route_id)
        .with_node_count(header.node_count);

    let (last_no, last) = lines[lines.len() - 1];
    let total = last
        .strip_prefix(TOTAL_PREFIX)
        .ok_or(ParseError::MissingLine(TOTAL_PREFIX))?;
    solution = solution.with_total_cost(parse_number(last_no, "total cost", total.trim())?);

    for &(line_no, line) in &lines[2..lines.len() - 1] {
        match line.strip_prefix(VEHICLE_PREFIX) {
            Some(count) => {
                let count = count.trim().parse().map_err(|_| ParseError::InvalidValue {
                    line: line_no,
                    field: "vehicle number",
                    value: count.trim().to_string(),
                })?;
                solution = solution.with_vehicle_count(count);
            }
            None => debug!(line = line_no, "ignoring solution line"),
        }
    }

    debug!(
        route = solution.route_id(),
        visits = solution.route().len(),
        "solution parsed"
    );
    Ok(solution)
}

struct RouteHeader<'a> {
    route_id: usize,
    node_count: usize,
    cost: f64,
    sequence: &'a str,
}

/// Splits `route <id>, node_num <n>, cost <c>, nodes: <sequence>`.
fn parse_route_header(line_no: usize, line: &str) -> Result<RouteHeader<'_>, ParseError> {
    let malformed = || ParseError::MalformedRoute(line.to_string());

    let (head, sequence) = line.split_once("nodes:").ok_or_else(malformed)?;
    let fields: Vec<&str> = head
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    let [route, node_num, cost] = fields[..] else {
        return Err(malformed());
    };

    let value_of = |field: &str, key: &str| -> Result<String, ParseError> {
        match field.split_once(char::is_whitespace) {
            Some((k, v)) if k == key => Ok(v.trim().to_string()),
            _ => Err(malformed()),
        }
    };

    let route_id = value_of(route, "route")?;
    let node_count = value_of(node_num, "node_num")?;
    let cost = value_of(cost, "cost")?;

    Ok(RouteHeader {
        route_id: route_id.parse().map_err(|_| ParseError::InvalidValue {
            line: line_no,
            field: "route id",
            value: route_id.clone(),
        })?,
        node_count: node_count.parse().map_err(|_| ParseError::InvalidValue {
            line: line_no,
            field: "node_num",
            value: node_count.clone(),
        })?,
        cost: parse_number(line_no, "cost", &cost)?,
        sequence,
    })
}

/// Parses a finite decimal; `NaN` and infinities are rejected.
fn parse_number(line: usize, field: &'static str, value: &str) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidValue {
            line,
            field,
            value: value.to_string(),
        })
}

/// Tokenizes a visit sequence such as `0(60.63, 60.63) 18 20(-0.00, 14.32) 0`.
///
/// Whitespace is allowed inside the parentheses. Columns in errors are
/// 1-based character positions within `sequence`.
///
/// # Errors
///
/// Returns [`ParseError::MalformedToken`] on the first character that does
/// not fit the grammar.
pub fn parse_route_sequence(sequence: &str) -> Result<Route, ParseError> {
    let mut lexer = Lexer::new(sequence);
    let mut route = Route::new();

    loop {
        lexer.skip_whitespace();
        if lexer.at_end() {
            break;
        }
        route.push_visit(lexer.visit()?);
        match lexer.peek() {
            None => break,
            Some(c) if c.is_whitespace() => {}
            Some(c) => return Err(lexer.error(format!("unexpected '{c}' after visit"))),
        }
    }

    Ok(route)
}

struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        self.column += 1;
        Some(c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |&(i, _)| i)
    }

    fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::MalformedToken {
            column: self.column,
            reason: reason.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.offset();
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        let end = self.offset();
        &self.src[start..end]
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn visit(&mut self) -> Result<Visit, ParseError> {
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected node id, found '{c}'")),
                None => self.error("expected node id"),
            });
        }
        let node_id: usize = digits
            .parse()
            .map_err(|_| self.error(format!("node id '{digits}' out of range")))?;

        if self.peek() != Some('(') {
            return Ok(Visit::new(node_id));
        }
        self.bump();
        let arrival = self.number()?;
        self.expect(',')?;
        let departure = self.number()?;
        self.expect(')')?;

        Ok(Visit::with_charges(node_id, arrival, departure))
    }

    fn number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let text = self.take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
        if text.is_empty() {
            return Err(self.error("expected charge value"));
        }
        let value = text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.error(format!("invalid charge value '{text}'")))?;
        self.skip_whitespace();
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(route: &Route) -> Vec<usize> {
        route.node_ids()
    }

    #[test]
    fn test_sequence_plain_and_annotated() {
        let r = parse_route_sequence("0(60.63, 60.63) 18(39.44, 60.63) 10 0(-0.00, -0.00)")
            .expect("valid");
        assert_eq!(ids(&r), vec![0, 18, 10, 0]);
        assert_eq!(r.visits()[1], Visit::with_charges(18, 39.44, 60.63));
        assert_eq!(r.visits()[2], Visit::new(10));
        assert_eq!(r.visits()[3].reported_arrival_charge, Some(-0.0));
    }

    #[test]
    fn test_sequence_whitespace_inside_parentheses() {
        let r = parse_route_sequence("  5(  1.5 ,2 )\t7  ").expect("valid");
        assert_eq!(r.visits()[0], Visit::with_charges(5, 1.5, 2.0));
        assert_eq!(ids(&r), vec![5, 7]);
    }

    #[test]
    fn test_sequence_empty() {
        assert!(parse_route_sequence("   ").expect("valid").is_empty());
    }

    #[test]
    fn test_sequence_missing_comma() {
        assert_eq!(
            parse_route_sequence("0(1.0 2.0)").unwrap_err(),
            ParseError::MalformedToken {
                column: 7,
                reason: "expected ',', found '2'".to_string()
            }
        );
    }

    #[test]
    fn test_sequence_unclosed() {
        assert!(matches!(
            parse_route_sequence("0(1.0, 2.0").unwrap_err(),
            ParseError::MalformedToken { column: 11, .. }
        ));
    }

    #[test]
    fn test_sequence_junk_after_visit() {
        assert!(matches!(
            parse_route_sequence("3(1,2)4").unwrap_err(),
            ParseError::MalformedToken { column: 7, .. }
        ));
        assert!(matches!(
            parse_route_sequence("3 x").unwrap_err(),
            ParseError::MalformedToken { column: 3, .. }
        ));
    }

    #[test]
    fn test_sequence_bad_number() {
        assert!(matches!(
            parse_route_sequence("3(1.2.3, 4)").unwrap_err(),
            ParseError::MalformedToken { .. }
        ));
    }

    const SOLUTION: &str = "\
Details of the solution:
route 2, node_num 4, cost 51.5, nodes: 0(60.00, 60.00) 1 16(10.00, 60.00) 0
vehicle (route) number: 1
Total cost: 1051.5
";

    #[test]
    fn test_parse_solution() {
        let sol = parse_solution(SOLUTION).expect("valid");
        assert_eq!(sol.route_id(), 2);
        assert_eq!(sol.reported_node_count(), Some(4));
        assert_eq!(sol.reported_segment_cost(), 51.5);
        assert_eq!(sol.reported_vehicle_count(), Some(1));
        assert_eq!(sol.reported_total_cost(), Some(1051.5));
        assert_eq!(sol.route().node_ids(), vec![0, 1, 16, 0]);
    }

    #[test]
    fn test_parse_solution_without_vehicle_line() {
        let text = SOLUTION.replace("vehicle (route) number: 1\n", "");
        let sol = parse_solution(&text).expect("valid");
        assert!(sol.reported_vehicle_count().is_none());
    }

    #[test]
    fn test_parse_solution_too_short() {
        assert_eq!(
            parse_solution("Details of the solution:\n").unwrap_err(),
            ParseError::TooShort(1)
        );
    }

    #[test]
    fn test_parse_solution_missing_details() {
        let text = SOLUTION.replace("Details of the solution", "Summary");
        assert_eq!(
            parse_solution(&text).unwrap_err(),
            ParseError::MissingLine(DETAILS_PREFIX)
        );
    }

    #[test]
    fn test_parse_solution_missing_total() {
        let text = SOLUTION.replace("Total cost: 1051.5\n", "");
        assert_eq!(
            parse_solution(&text).unwrap_err(),
            ParseError::MissingLine(TOTAL_PREFIX)
        );
    }

    #[test]
    fn test_parse_solution_malformed_route_line() {
        let text = SOLUTION.replace("node_num 4, ", "");
        assert!(matches!(
            parse_solution(&text).unwrap_err(),
            ParseError::MalformedRoute(_)
        ));
    }

    #[test]
    fn test_parse_solution_rejects_non_finite_costs() {
        let text = SOLUTION.replace("cost 51.5", "cost NaN");
        assert_eq!(
            parse_solution(&text).unwrap_err(),
            ParseError::InvalidValue {
                line: 2,
                field: "cost",
                value: "NaN".to_string()
            }
        );

        let text = SOLUTION.replace("Total cost: 1051.5", "Total cost: inf");
        assert_eq!(
            parse_solution(&text).unwrap_err(),
            ParseError::InvalidValue {
                line: 4,
                field: "total cost",
                value: "inf".to_string()
            }
        );
    }

    #[test]
    fn test_sequence_rejects_overflowing_charge() {
        assert!(matches!(
            parse_route_sequence("0(1e999, 2)").unwrap_err(),
            ParseError::MalformedToken { .. }
        ));
    }

    #[test]
    fn test_parse_solution_bad_cost() {
        let text = SOLUTION.replace("cost 51.5", "cost abc");
        assert_eq!(
            parse_solution(&text).unwrap_err(),
            ParseError::InvalidValue {
                line: 2,
                field: "cost",
                value: "abc".to_string()
            }
        );
    }
}
