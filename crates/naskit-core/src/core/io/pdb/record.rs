use super::{ElementPolicy, PdbError, PdbParseErrorKind, ReadOptions};
use crate::core::models::atom::Atom;
use nalgebra::Point3;

pub(super) const RECORD_WIDTH: usize = 80;

fn slice_and_trim(line: &str, start: usize, end: usize) -> Result<&str, PdbParseErrorKind> {
    line.get(start..end)
        .map(str::trim)
        .ok_or(PdbParseErrorKind::NonAscii { column: start + 1 })
}

fn column_char(line: &str, index: usize) -> Result<char, PdbParseErrorKind> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .ok_or(PdbParseErrorKind::NonAscii { column: index + 1 })
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<T, PdbParseErrorKind> {
    let value = slice_and_trim(line, start, end)?;
    value.parse().map_err(|_| PdbParseErrorKind::InvalidInt {
        columns,
        value: value.to_string(),
    })
}

fn parse_float(
    line: &str,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<f64, PdbParseErrorKind> {
    let value = slice_and_trim(line, start, end)?;
    value.parse().map_err(|_| PdbParseErrorKind::InvalidFloat {
        columns,
        value: value.to_string(),
    })
}

fn parse_optional_float(
    line: &str,
    start: usize,
    end: usize,
    columns: &'static str,
    default: f64,
) -> Result<f64, PdbParseErrorKind> {
    if slice_and_trim(line, start, end)?.is_empty() {
        Ok(default)
    } else {
        parse_float(line, start, end, columns)
    }
}

/// Decodes the two-column formal charge field.
///
/// Digit and sign may come in either order; a blank field is neutral and a lone character `c`
/// is read as `1c`.
///
/// # Errors
///
/// Returns [`PdbParseErrorKind::InvalidChargeMagnitude`] if the magnitude is not a digit and
/// [`PdbParseErrorKind::InvalidChargeSign`] if the sign is neither `+` nor `-`.
pub fn decode_charge(field: &str) -> Result<i8, PdbParseErrorKind> {
    let field = field.trim();
    let text = match field.chars().count() {
        0 => "+0".to_string(),
        1 => format!("1{field}"),
        _ => field.to_string(),
    };
    let mut chars: Vec<char> = text.chars().collect();
    chars.sort_unstable();

    match chars.as_slice() {
        &[sign, digit] => {
            let magnitude = digit
                .to_digit(10)
                .ok_or_else(|| PdbParseErrorKind::InvalidChargeMagnitude(field.to_string()))?
                as i8;
            match sign {
                '+' => Ok(magnitude),
                '-' => Ok(-magnitude),
                _ => Err(PdbParseErrorKind::InvalidChargeSign(field.to_string())),
            }
        }
        _ => Err(PdbParseErrorKind::InvalidChargeMagnitude(field.to_string())),
    }
}

/// Parses one `ATOM`/`HETATM` line into a detached atom carrying its residue identity.
///
/// # Arguments
///
/// * `line` - The raw record, possibly shorter than 80 columns.
/// * `line_num` - 1-based line number used in errors.
/// * `options` - Decides how a blank element column is handled.
///
/// # Errors
///
/// Returns [`PdbError::Parse`] if a numeric field is malformed, the element is missing under
/// [`ElementPolicy::Required`], the charge field is invalid, or the line holds non-ASCII text
/// that would shift the fixed columns.
pub(super) fn parse_atom_record(
    line: &str,
    line_num: usize,
    options: &ReadOptions,
) -> Result<Atom, PdbError> {
    let parse_error = |kind| PdbError::Parse {
        line: line_num,
        kind,
    };
    if let Some(offset) = line.find(|c: char| !c.is_ascii()) {
        return Err(parse_error(PdbParseErrorKind::NonAscii { column: offset + 1 }));
    }
    let padded = format!("{line:<RECORD_WIDTH$}");
    let line = padded.as_str();

    let is_hetatm = line.starts_with("HETATM");
    let serial: usize = parse_int(line, 6, 11, "7-11").map_err(parse_error)?;
    let name = slice_and_trim(line, 12, 16).map_err(parse_error)?;
    let alt_loc = column_char(line, 16).map_err(parse_error)?;
    let residue_name = slice_and_trim(line, 17, 21).map_err(parse_error)?;
    let chain_id = column_char(line, 21).map_err(parse_error)?;
    let residue_number: isize = parse_int(line, 22, 27, "23-27").map_err(parse_error)?;
    let x = parse_float(line, 30, 38, "31-38").map_err(parse_error)?;
    let y = parse_float(line, 38, 46, "39-46").map_err(parse_error)?;
    let z = parse_float(line, 46, 54, "47-54").map_err(parse_error)?;
    let occupancy = parse_optional_float(line, 54, 60, "55-60", 1.0).map_err(parse_error)?;
    let temperature_factor =
        parse_optional_float(line, 60, 66, "61-66", 0.0).map_err(parse_error)?;
    let segment = slice_and_trim(line, 72, 76).map_err(parse_error)?;
    let charge = decode_charge(slice_and_trim(line, 78, 80).map_err(parse_error)?)
        .map_err(parse_error)?;

    let element_field = slice_and_trim(line, 76, 78).map_err(parse_error)?;
    let element = match (element_field, options.element_policy) {
        ("", ElementPolicy::Required) => return Err(parse_error(PdbParseErrorKind::MissingElement)),
        ("", ElementPolicy::Derive(derive)) => derive(is_hetatm, name, residue_name, chain_id),
        (element, _) => element.to_string(),
    };

    let mut atom = Atom::new(name, &element, Point3::new(x, y, z)).with_residue(
        residue_name,
        chain_id,
        residue_number,
    );
    atom.is_hetatm = is_hetatm;
    atom.serial = serial;
    atom.alt_loc = alt_loc;
    atom.occupancy = Some(occupancy);
    atom.temperature_factor = Some(temperature_factor);
    atom.segment = segment.to_string();
    atom.charge = charge;
    Ok(atom)
}

/// Places an atom name in the four name columns.
///
/// Four-character names fill the field; one-character names and names of one-letter elements
/// start in the second column; everything else starts in the first.
pub fn format_atom_name(name: &str, element: &str) -> String {
    let name_len = name.chars().count();
    if name_len >= 4 {
        name.to_string()
    } else if name_len == 1 {
        format!(" {name}  ")
    } else if element.trim().chars().count() == 1 {
        format!(" {name:<3}")
    } else {
        format!("{name:<4}")
    }
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:6.2}"),
        None => " ".repeat(6),
    }
}

/// Magnitude then sign, with a magnitude of one implied.
fn format_charge(charge: i8) -> String {
    let sign = if charge < 0 { '-' } else { '+' };
    match charge.unsigned_abs() {
        0 => String::new(),
        1 => sign.to_string(),
        magnitude => format!("{magnitude}{sign}"),
    }
}

pub(super) fn format_atom_record(atom: &Atom) -> String {
    let record = if atom.is_hetatm { "HETATM" } else { "ATOM" };
    let name = format_atom_name(atom.name(), &atom.element);
    let residue_name = format!("{:<4}", format!("{:>3}", atom.residue_name()));
    let residue_number = format!("{:<5}", format!("{:>4}", atom.residue_number()));
    let segment: String = atom.segment.chars().take(4).collect();
    format!(
        "{record:<6}{serial:>5} {name}{alt_loc}{residue_name}{chain_id}{residue_number}   {x:>8.3}{y:>8.3}{z:>8.3}{occupancy}{temperature}      {segment:<4}{element:>2}{charge:<2}",
        serial = atom.serial,
        alt_loc = atom.alt_loc,
        chain_id = atom.chain_id(),
        x = atom.position.x,
        y = atom.position.y,
        z = atom.position.z,
        occupancy = format_optional(atom.occupancy),
        temperature = format_optional(atom.temperature_factor),
        element = atom.element,
        charge = format_charge(atom.charge),
    )
}
