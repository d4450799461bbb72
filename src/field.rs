//! Header field schema: which byte offsets name a field, and how wide it is.
//!
//! A field identifier is the 1-based byte offset of the field within its
//! header, as published by the SEG-Y rev-1 standard. Trace-header fields are
//! keyed 1..240; binary-header fields keep the standard's file-start-based
//! offsets 3201..3600 and the lookup subtracts the textual header size
//! internally. Offsets that do not start a field are unrecognized and fail
//! with [`Error::InvalidField`].

use byteorder::{BigEndian, ByteOrder};

use crate::error::Error;
use crate::{BINARY_HEADER_SIZE, TEXT_HEADER_SIZE, TRACE_HEADER_SIZE};

/// Width of a recognized header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    Two,
    Four,
}

impl FieldWidth {
    pub fn bytes(self) -> usize {
        match self {
            FieldWidth::Two => 2,
            FieldWidth::Four => 4,
        }
    }
}

/// Trace-header fields, named after the SEG-Y rev-1 standard.
///
/// The discriminant is the field's 1-based byte offset, so any variant can
/// be passed where a raw field identifier is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TraceField {
    TraceSequenceLine = 1,
    TraceSequenceFile = 5,
    FieldRecord = 9,
    TraceNumber = 13,
    EnergySourcePoint = 17,
    Cdp = 21,
    CdpTrace = 25,
    TraceIdentificationCode = 29,
    SummedTraces = 31,
    StackedTraces = 33,
    DataUse = 35,
    Offset = 37,
    ReceiverGroupElevation = 41,
    SourceSurfaceElevation = 45,
    SourceDepth = 49,
    ReceiverDatumElevation = 53,
    SourceDatumElevation = 57,
    SourceWaterDepth = 61,
    GroupWaterDepth = 65,
    ElevationScalar = 69,
    SourceGroupScalar = 71,
    SourceX = 73,
    SourceY = 77,
    GroupX = 81,
    GroupY = 85,
    CoordinateUnits = 89,
    WeatheringVelocity = 91,
    SubWeatheringVelocity = 93,
    SourceUpholeTime = 95,
    GroupUpholeTime = 97,
    SourceStaticCorrection = 99,
    GroupStaticCorrection = 101,
    TotalStaticApplied = 103,
    LagTimeA = 105,
    LagTimeB = 107,
    DelayRecordingTime = 109,
    MuteTimeStart = 111,
    MuteTimeEnd = 113,
    SampleCount = 115,
    SampleInterval = 117,
    GainType = 119,
    InstrumentGainConstant = 121,
    InstrumentInitialGain = 123,
    Correlated = 125,
    SweepFrequencyStart = 127,
    SweepFrequencyEnd = 129,
    SweepLength = 131,
    SweepType = 133,
    SweepTraceTaperLengthStart = 135,
    SweepTraceTaperLengthEnd = 137,
    TaperType = 139,
    AliasFilterFrequency = 141,
    AliasFilterSlope = 143,
    NotchFilterFrequency = 145,
    NotchFilterSlope = 147,
    LowCutFrequency = 149,
    HighCutFrequency = 151,
    LowCutSlope = 153,
    HighCutSlope = 155,
    YearDataRecorded = 157,
    DayOfYear = 159,
    HourOfDay = 161,
    MinuteOfHour = 163,
    SecondOfMinute = 165,
    TimeBaseCode = 167,
    TraceWeightingFactor = 169,
    GeophoneGroupNumberRoll = 171,
    GeophoneGroupNumberFirstTrace = 173,
    GeophoneGroupNumberLastTrace = 175,
    GapSize = 177,
    OverTravel = 179,
    CdpX = 181,
    CdpY = 185,
    Inline3D = 189,
    Crossline3D = 193,
    ShotPoint = 197,
    ShotPointScalar = 201,
    MeasurementUnit = 203,
    TransductionConstantMantissa = 205,
    TransductionConstantPower = 209,
    TransductionUnit = 211,
    TraceIdentifier = 213,
    ScalarTraceHeader = 215,
    SourceType = 217,
    SourceEnergyDirectionMantissa = 219,
    SourceEnergyDirectionExponent = 223,
    SourceMeasurementMantissa = 225,
    SourceMeasurementExponent = 229,
    SourceMeasurementUnit = 231,
    UnassignedInt1 = 233,
    UnassignedInt2 = 237,
}

impl From<TraceField> for i32 {
    fn from(f: TraceField) -> i32 {
        f as i32
    }
}

/// Binary-header fields, keyed by their byte offset from the start of the
/// file as in the SEG-Y standard (the textual header precedes the binary
/// header, so the first field sits at 3201).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum BinField {
    JobId = 3201,
    LineNumber = 3205,
    ReelNumber = 3209,
    Traces = 3213,
    AuxTraces = 3215,
    Interval = 3217,
    IntervalOriginal = 3219,
    Samples = 3221,
    SamplesOriginal = 3223,
    Format = 3225,
    EnsembleFold = 3227,
    SortingCode = 3229,
    VerticalSum = 3231,
    SweepFrequencyStart = 3233,
    SweepFrequencyEnd = 3235,
    SweepLength = 3237,
    Sweep = 3239,
    SweepChannel = 3241,
    SweepTaperStart = 3243,
    SweepTaperEnd = 3245,
    Taper = 3247,
    CorrelatedTraces = 3249,
    BinaryGainRecovery = 3251,
    AmplitudeRecovery = 3253,
    MeasurementSystem = 3255,
    ImpulseSignalPolarity = 3257,
    VibratoryPolarity = 3259,
    SegyRevision = 3501,
    TraceFlag = 3503,
    ExtendedHeaders = 3505,
}

impl From<BinField> for i32 {
    fn from(f: BinField) -> i32 {
        f as i32
    }
}

/// Looks up the width of a trace-header field, `None` if unrecognized.
pub fn trace_field_width(field: i32) -> Option<FieldWidth> {
    match field {
        1 | 5 | 9 | 13 | 17 | 21 | 25 | 37 | 41 | 45 | 49 | 53 | 57 | 61 | 65 | 73 | 77 | 81
        | 85 | 181 | 185 | 189 | 193 | 197 | 205 | 219 | 225 | 233 | 237 => {
            Some(FieldWidth::Four)
        }
        29 | 31 | 33 | 35 | 69 | 71 | 201 | 203 | 209 | 211 | 213 | 215 | 217 | 223 | 229
        | 231 => Some(FieldWidth::Two),
        // The run of 2-byte fields from CoordinateUnits through OverTravel.
        f if (89..=179).contains(&f) && f % 2 == 1 => Some(FieldWidth::Two),
        _ => None,
    }
}

/// Looks up the width of a binary-header field (file-start-based offset),
/// `None` if unrecognized.
pub fn binary_field_width(field: i32) -> Option<FieldWidth> {
    match field {
        3201 | 3205 | 3209 => Some(FieldWidth::Four),
        3501 | 3503 | 3505 => Some(FieldWidth::Two),
        // The run of 2-byte fields from Traces through VibratoryPolarity.
        f if (3213..=3259).contains(&f) && f % 2 == 1 => Some(FieldWidth::Two),
        _ => None,
    }
}

fn get(header: &[u8], start: usize, width: FieldWidth) -> Option<i32> {
    let bytes = header.get(start..start + width.bytes())?;
    Some(match width {
        FieldWidth::Four => BigEndian::read_i32(bytes),
        FieldWidth::Two => BigEndian::read_i16(bytes) as i32,
    })
}

fn set(header: &mut [u8], start: usize, width: FieldWidth, value: i32) -> Option<()> {
    let bytes = header.get_mut(start..start + width.bytes())?;
    match width {
        FieldWidth::Four => BigEndian::write_i32(bytes, value),
        FieldWidth::Two => BigEndian::write_i16(bytes, value as i16),
    }
    Some(())
}

/// Reads a field from a trace header buffer, sign-extended to `i32`.
pub fn get_field(header: &[u8], field: impl Into<i32>) -> Result<i32, Error> {
    let field = field.into();
    if !(1..TRACE_HEADER_SIZE as i32).contains(&field) {
        return Err(Error::InvalidField(field));
    }
    let width = trace_field_width(field).ok_or(Error::InvalidField(field))?;
    get(header, (field - 1) as usize, width).ok_or(Error::InvalidField(field))
}

/// Writes a field into a trace header buffer. Only the field's bytes are
/// touched.
pub fn set_field(header: &mut [u8], field: impl Into<i32>, value: i32) -> Result<(), Error> {
    let field = field.into();
    if !(1..TRACE_HEADER_SIZE as i32).contains(&field) {
        return Err(Error::InvalidField(field));
    }
    let width = trace_field_width(field).ok_or(Error::InvalidField(field))?;
    set(header, (field - 1) as usize, width, value).ok_or(Error::InvalidField(field))
}

/// Reads a field from a binary header buffer, sign-extended to `i32`.
///
/// `field` uses the standard's file-start-based offsets (3201..3600).
pub fn get_bfield(header: &[u8], field: impl Into<i32>) -> Result<i32, Error> {
    let field = field.into();
    let local = field - TEXT_HEADER_SIZE as i32;
    if !(0..BINARY_HEADER_SIZE as i32).contains(&local) {
        return Err(Error::InvalidField(field));
    }
    let width = binary_field_width(field).ok_or(Error::InvalidField(field))?;
    get(header, (local - 1) as usize, width).ok_or(Error::InvalidField(field))
}

/// Writes a field into a binary header buffer (file-start-based offsets).
pub fn set_bfield(header: &mut [u8], field: impl Into<i32>, value: i32) -> Result<(), Error> {
    let field = field.into();
    let local = field - TEXT_HEADER_SIZE as i32;
    if !(0..BINARY_HEADER_SIZE as i32).contains(&local) {
        return Err(Error::InvalidField(field));
    }
    let width = binary_field_width(field).ok_or(Error::InvalidField(field))?;
    set(header, (local - 1) as usize, width, value).ok_or(Error::InvalidField(field))
}

/// On-disk sample encodings, by the binary header's format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SampleFormat {
    /// 4-byte IBM hexadecimal float.
    IbmFloat4 = 1,
    /// 4-byte two's complement integer.
    Int4 = 2,
    /// 2-byte two's complement integer.
    Int2 = 3,
    /// 4-byte fixed point with gain (obsolete).
    FixedPointGain4 = 4,
    /// 4-byte IEEE-754 float.
    IeeeFloat4 = 5,
    NotInUse1 = 6,
    NotInUse2 = 7,
    /// 1-byte two's complement integer.
    Int1 = 8,
}

impl SampleFormat {
    pub fn name(self) -> &'static str {
        match self {
            SampleFormat::IbmFloat4 => "IBM Float",
            SampleFormat::Int4 => "Int 32",
            SampleFormat::Int2 => "Int 16",
            SampleFormat::FixedPointGain4 => "Fixed Point with gain (Obsolete)",
            SampleFormat::IeeeFloat4 => "IEEE Float",
            SampleFormat::NotInUse1 => "Not in Use 1",
            SampleFormat::NotInUse2 => "Not in Use 2",
            SampleFormat::Int1 => "Int 8",
        }
    }

    /// On-disk bytes per sample for this format.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::Int2 => 2,
            SampleFormat::Int1 => 1,
            _ => 4,
        }
    }
}

impl TryFrom<i32> for SampleFormat {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Error> {
        Ok(match code {
            1 => SampleFormat::IbmFloat4,
            2 => SampleFormat::Int4,
            3 => SampleFormat::Int2,
            4 => SampleFormat::FixedPointGain4,
            5 => SampleFormat::IeeeFloat4,
            6 => SampleFormat::NotInUse1,
            7 => SampleFormat::NotInUse2,
            8 => SampleFormat::Int1,
            _ => return Err(Error::InvalidArgs(format!("unknown sample format code {code}"))),
        })
    }
}

/// Reads the samples-per-trace count from a binary header buffer.
pub fn sample_count(binheader: &[u8]) -> Result<u32, Error> {
    let samples = get_bfield(binheader, BinField::Samples)?;
    Ok(samples as u16 as u32)
}

/// Reads and parses the sample format code from a binary header buffer.
pub fn format(binheader: &[u8]) -> Result<SampleFormat, Error> {
    SampleFormat::try_from(get_bfield(binheader, BinField::Format)?)
}

/// File offset of the first trace: the textual and binary headers plus any
/// extended textual headers declared in the binary header.
pub fn trace0(binheader: &[u8]) -> Result<u64, Error> {
    let extra = get_bfield(binheader, BinField::ExtendedHeaders)?;
    if extra < 0 {
        return Err(Error::InvalidArgs(format!(
            "negative extended header count {extra}"
        )));
    }
    Ok((TEXT_HEADER_SIZE + BINARY_HEADER_SIZE) as u64 + TEXT_HEADER_SIZE as u64 * extra as u64)
}

/// Sample-body size of one trace in bytes.
///
/// Four bytes per sample is an invariant of this library; formats with a
/// different width are rejected at the read/write boundary instead.
pub fn trace_bsize(samples: u32) -> u32 {
    samples * 4
}
