//! Contains the attribute values that configure how an image is written,
//! and the small value types that describe the pixels handed to the writer.

use smallvec::SmallVec;


/// The names of all attributes that influence the output.
/// Any other attribute is stored but ignored.
pub mod name {

    /// Text. The canonical name of a block compression. Unknown names write raw pixels.
    pub const COMPRESSION: &str = "compression";

    /// Integer. The number of bits per raw pixel. Defaults to 8 bits per channel.
    pub const BITS_PER_SAMPLE: &str = "oiio:BitsPerSample";

    /// Integer. Add a small per-pixel noise before quantizing to 8 bits.
    pub const DITHER: &str = "oiio:dither";

    /// Float. In `DXT1` blocks, pixels with less alpha become fully transparent.
    pub const ALPHA_CUTOFF: &str = "dds:AlphaCutoff";

    /// Integer. The number of raw pixel bits used by the red channel.
    pub const BIT_COUNT_RED: &str = "dds:BitCountR";

    /// Integer. The number of raw pixel bits used by the green channel.
    pub const BIT_COUNT_GREEN: &str = "dds:BitCountG";

    /// Integer. The number of raw pixel bits used by the blue channel.
    pub const BIT_COUNT_BLUE: &str = "dds:BitCountB";

    /// Integer. The number of raw pixel bits used by the alpha channel.
    pub const BIT_COUNT_ALPHA: &str = "dds:BitCountA";

    /// The bit count attributes, in `r, g, b, a` order.
    pub const BIT_COUNTS: [&str; 4] = [ BIT_COUNT_RED, BIT_COUNT_GREEN, BIT_COUNT_BLUE, BIT_COUNT_ALPHA ];
}


/// Contains one of all possible attribute values.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {

    /// A string.
    Text(String),

    /// 32-bit signed integer.
    I32(i32),

    /// 32-bit float.
    F32(f32),
}

impl From<&str> for AttributeValue {
    fn from(text: &str) -> Self { AttributeValue::Text(text.to_owned()) }
}

impl From<String> for AttributeValue {
    fn from(text: String) -> Self { AttributeValue::Text(text) }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self { AttributeValue::I32(value) }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self { AttributeValue::F32(value) }
}

impl AttributeValue {

    /// Return the contained text, if this is a text attribute.
    pub fn to_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Return the contained integer, if this is an integer attribute.
    pub fn to_i32(&self) -> Option<i32> {
        match *self {
            AttributeValue::I32(value) => Some(value),
            _ => None,
        }
    }

    /// Return the value as a float. Integers are converted.
    pub fn to_f32(&self) -> Option<f32> {
        match *self {
            AttributeValue::F32(value) => Some(value),
            AttributeValue::I32(value) => Some(value as f32),
            AttributeValue::Text(_) => None,
        }
    }
}


/// A small list of named values. Names are unique, inserting replaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    list: SmallVec<[(String, AttributeValue); 6]>,
}

impl Attributes {

    /// An empty list.
    pub fn new() -> Self { Self::default() }

    /// Add the value, replacing any value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();

        match self.list.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.list.push((name, value)),
        }
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.list.iter().find(|(existing, _)| existing == name).map(|(_, value)| value)
    }

    /// Look up a text value. Values of other types are ignored.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::to_text)
    }

    /// Look up an integer value, or use the default if absent or not an integer.
    pub fn i32_or(&self, name: &str, default: i32) -> i32 {
        self.get(name).and_then(AttributeValue::to_i32).unwrap_or(default)
    }

    /// Look up a float value, or use the default if absent or not a number.
    pub fn f32_or(&self, name: &str, default: f32) -> f32 {
        self.get(name).and_then(AttributeValue::to_f32).unwrap_or(default)
    }

    /// The number of stored attributes.
    pub fn len(&self) -> usize { self.list.len() }

    /// Whether no attributes are stored.
    pub fn is_empty(&self) -> bool { self.list.is_empty() }

    /// All attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.list.iter().map(|(name, value)| (name.as_str(), value))
    }
}


/// The data type of a single sample, as handed to the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {

    /// Unsigned 8-bit integer, `0` to `255`.
    U8,

    /// Unsigned 16-bit integer, `0` to `65535`, in native byte order.
    U16,

    /// 16-bit float, in native byte order. Values from `0.0` to `1.0` are in range.
    F16,

    /// 32-bit float, in native byte order. Values from `0.0` to `1.0` are in range.
    F32,
}

impl SampleType {

    /// How many bytes a single sample takes up.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleType::U8 => 1,
            SampleType::U16 | SampleType::F16 => 2,
            SampleType::F32 => 4,
        }
    }
}


/// Which interleaved channel of a pixel carries which color.
/// Absent colors are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelIndices {

    /// The index of the red channel.
    pub red: Option<usize>,

    /// The index of the green channel.
    pub green: Option<usize>,

    /// The index of the blue channel.
    pub blue: Option<usize>,

    /// The index of the alpha channel.
    pub alpha: Option<usize>,
}

impl ChannelIndices {

    /// The conventional layout for a number of channels:
    /// one channel is red, two are red and green,
    /// three are rgb, four are rgba.
    pub fn for_channel_count(channel_count: usize) -> Self {
        let index = |channel: usize| if channel < channel_count { Some(channel) } else { None };
        ChannelIndices { red: index(0), green: index(1), blue: index(2), alpha: index(3) }
    }

    /// All indices in `r, g, b, a` order.
    pub fn to_array(self) -> [Option<usize>; 4] {
        [ self.red, self.green, self.blue, self.alpha ]
    }
}
