//! Serialized image payloads.
//!
//! Every stored image is normalized to a `channel × rows × cols` array so the
//! display side can rely on one shape. The stored blob is the bincode form of
//! the array, which round-trips every `f64` bit-for-bit.

use ndarray::{Array3, ArrayD, ArrayView2, Axis};

use crate::error::{Error, ExtractionError, Result};

/// Image data of one dataset, shaped `channel × rows × cols`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePayload {
    data: Array3<f64>,
}

impl ImagePayload {
    /// Wraps an array that already has three axes.
    #[must_use]
    pub fn new(data: Array3<f64>) -> Self {
        Self { data }
    }

    /// Coerces an array of any dimensionality to `channel × rows × cols`.
    ///
    /// Missing leading axes become length 1; extra leading axes are folded
    /// into the channel axis.
    ///
    /// # Errors
    /// Returns an error if the reshape fails.
    pub fn from_dyn(array: ArrayD<f64>) -> std::result::Result<Self, ExtractionError> {
        let shape = coerced_shape(array.shape());
        let values: Vec<f64> = array.iter().copied().collect();
        Array3::from_shape_vec(shape, values)
            .map(Self::new)
            .map_err(|e| ExtractionError::Payload(e.to_string()))
    }

    /// `(channels, rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// One channel as a 2-D image, if it exists.
    #[must_use]
    pub fn channel(&self, index: usize) -> Option<ArrayView2<'_, f64>> {
        (index < self.data.len_of(Axis(0))).then(|| self.data.index_axis(Axis(0), index))
    }

    /// Smallest and largest finite value, for display normalization.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Borrow the underlying array.
    #[must_use]
    pub fn as_array(&self) -> &Array3<f64> {
        &self.data
    }

    /// Serialize to the stored blob form.
    ///
    /// # Errors
    /// Returns [`Error::Payload`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(&self.data).map_err(|e| Error::Payload(e.to_string()))
    }

    /// Inverse of [`ImagePayload::encode`].
    ///
    /// # Errors
    /// Returns [`Error::Payload`] if the bytes are not a serialized 3-D array.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize::<Array3<f64>>(bytes)
            .map(Self::new)
            .map_err(|e| Error::Payload(e.to_string()))
    }
}

fn coerced_shape(shape: &[usize]) -> (usize, usize, usize) {
    match *shape {
        [] => (1, 1, 1),
        [cols] => (1, 1, cols),
        [rows, cols] => (1, rows, cols),
        [channels, rows, cols] => (channels, rows, cols),
        [ref leading @ .., rows, cols] => (leading.iter().product(), rows, cols),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr0, arr1, arr2, IxDyn};

    #[test]
    fn test_scalar_becomes_single_pixel() {
        let payload = ImagePayload::from_dyn(arr0(4.5).into_dyn()).unwrap();
        assert_eq!(payload.shape(), (1, 1, 1));
    }

    #[test]
    fn test_line_becomes_one_row() {
        let payload = ImagePayload::from_dyn(arr1(&[1.0, 2.0, 3.0]).into_dyn()).unwrap();
        assert_eq!(payload.shape(), (1, 1, 3));
    }

    #[test]
    fn test_image_gets_channel_axis() {
        let payload =
            ImagePayload::from_dyn(arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).into_dyn())
                .unwrap();
        assert_eq!(payload.shape(), (1, 3, 2));
        let channel = payload.channel(0).unwrap();
        assert_relative_eq!(channel[[2, 1]], 6.0);
        assert!(payload.channel(1).is_none());
    }

    #[test]
    fn test_extra_axes_fold_into_channels() {
        let array = ArrayD::from_shape_vec(IxDyn(&[2, 3, 4, 5]), (0..120).map(f64::from).collect())
            .unwrap();
        let payload = ImagePayload::from_dyn(array).unwrap();
        assert_eq!(payload.shape(), (6, 4, 5));
        assert_relative_eq!(payload.channel(5).unwrap()[[3, 4]], 119.0);
    }

    #[test]
    fn test_encode_decode_is_lossless() {
        let original = ImagePayload::from_dyn(
            arr2(&[[0.1, f64::MIN_POSITIVE], [-1.0e300, f64::NAN]]).into_dyn(),
        )
        .unwrap();
        let bytes = original.encode().unwrap();
        let decoded = ImagePayload::decode(&bytes).unwrap();

        assert_eq!(decoded.shape(), original.shape());
        for (a, b) in original.as_array().iter().zip(decoded.as_array().iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_value_range_skips_nan() {
        let payload =
            ImagePayload::from_dyn(arr1(&[3.0, f64::NAN, -2.0, 8.5]).into_dyn()).unwrap();
        let (lo, hi) = payload.value_range().unwrap();
        assert_relative_eq!(lo, -2.0);
        assert_relative_eq!(hi, 8.5);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            ImagePayload::decode(&[1, 2, 3]),
            Err(Error::Payload(_))
        ));
    }
}
