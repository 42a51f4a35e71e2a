use gesture_base::Tensor;
use gesture_infer::{
    ModelSource,
    onnx::{ndarray_to_tensor, tensor_to_ndarray},
};
use ndarray::ArrayD;
use std::path::{Path, PathBuf};

#[test]
fn test_tensor_to_ndarray_conversion() {
    let tensor = Tensor::new(vec![1, 3], vec![1.0, 2.0, 3.0]).unwrap();
    let array = tensor_to_ndarray(tensor).unwrap();
    assert_eq!(array.shape(), &[1, 3]);
    assert_eq!(array[[0, 2]], 3.0);
}

#[test]
fn test_ndarray_to_tensor_conversion() {
    let array = ArrayD::<f32>::from_shape_vec(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let tensor = ndarray_to_tensor(array.view()).unwrap();
    assert_eq!(tensor.shape, vec![2, 2]);
    assert_eq!(tensor.data, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_model_source_from_path() {
    let source: ModelSource = Path::new("model/hand_landmark.onnx").into();
    assert!(matches!(source, ModelSource::File(p) if p == PathBuf::from("model/hand_landmark.onnx")));
}
