//! Types and qualifiers.
//!
//! A [`TypeSpecifier`] describes the value type itself, (a builtin type, a user-named type, an inline struct, or an
//! array of any of these), whilst a [`SpecifiedType`] pairs a specifier with any number of [`TypeQualifier`]s.

use crate::{node::Node, printing};

macro_rules! builtin_types {
	($($variant:ident => $name:literal,)*) => {
		/// A builtin type.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		#[cfg_attr(feature = "serde", derive(serde::Serialize))]
		pub enum BuiltinType {
			$($variant,)*
		}

		impl BuiltinType {
			/// Tries to match a keyword to a builtin type.
			pub fn from_name(name: &str) -> Option<Self> {
				match name {
					$($name => Some(Self::$variant),)*
					_ => None,
				}
			}

			/// Returns the keyword of this builtin type.
			pub fn name(&self) -> &'static str {
				match self {
					$(Self::$variant => $name,)*
				}
			}
		}
	};
}

#[rustfmt::skip]
builtin_types! {
	Void => "void", Bool => "bool", Int => "int", UInt => "uint", Float => "float", Double => "double",
	Vec2 => "vec2", Vec3 => "vec3", Vec4 => "vec4",
	DVec2 => "dvec2", DVec3 => "dvec3", DVec4 => "dvec4",
	BVec2 => "bvec2", BVec3 => "bvec3", BVec4 => "bvec4",
	IVec2 => "ivec2", IVec3 => "ivec3", IVec4 => "ivec4",
	UVec2 => "uvec2", UVec3 => "uvec3", UVec4 => "uvec4",
	Mat2 => "mat2", Mat3 => "mat3", Mat4 => "mat4",
	Mat2x2 => "mat2x2", Mat2x3 => "mat2x3", Mat2x4 => "mat2x4",
	Mat3x2 => "mat3x2", Mat3x3 => "mat3x3", Mat3x4 => "mat3x4",
	Mat4x2 => "mat4x2", Mat4x3 => "mat4x3", Mat4x4 => "mat4x4",
	DMat2 => "dmat2", DMat3 => "dmat3", DMat4 => "dmat4",
	DMat2x2 => "dmat2x2", DMat2x3 => "dmat2x3", DMat2x4 => "dmat2x4",
	DMat3x2 => "dmat3x2", DMat3x3 => "dmat3x3", DMat3x4 => "dmat3x4",
	DMat4x2 => "dmat4x2", DMat4x3 => "dmat4x3", DMat4x4 => "dmat4x4",
	AtomicUInt => "atomic_uint",
	Sampler1D => "sampler1D", Sampler2D => "sampler2D", Sampler3D => "sampler3D", SamplerCube => "samplerCube",
	Sampler2DRect => "sampler2DRect", Sampler1DArray => "sampler1DArray", Sampler2DArray => "sampler2DArray",
	SamplerCubeArray => "samplerCubeArray", SamplerBuffer => "samplerBuffer", Sampler2DMS => "sampler2DMS",
	Sampler2DMSArray => "sampler2DMSArray",
	Sampler1DShadow => "sampler1DShadow", Sampler2DShadow => "sampler2DShadow",
	Sampler2DRectShadow => "sampler2DRectShadow", Sampler1DArrayShadow => "sampler1DArrayShadow",
	Sampler2DArrayShadow => "sampler2DArrayShadow", SamplerCubeShadow => "samplerCubeShadow",
	SamplerCubeArrayShadow => "samplerCubeArrayShadow",
	ISampler1D => "isampler1D", ISampler2D => "isampler2D", ISampler3D => "isampler3D", ISamplerCube => "isamplerCube",
	ISampler2DRect => "isampler2DRect", ISampler1DArray => "isampler1DArray", ISampler2DArray => "isampler2DArray",
	ISamplerCubeArray => "isamplerCubeArray", ISamplerBuffer => "isamplerBuffer", ISampler2DMS => "isampler2DMS",
	ISampler2DMSArray => "isampler2DMSArray",
	USampler1D => "usampler1D", USampler2D => "usampler2D", USampler3D => "usampler3D", USamplerCube => "usamplerCube",
	USampler2DRect => "usampler2DRect", USampler1DArray => "usampler1DArray", USampler2DArray => "usampler2DArray",
	USamplerCubeArray => "usamplerCubeArray", USamplerBuffer => "usamplerBuffer", USampler2DMS => "usampler2DMS",
	USampler2DMSArray => "usampler2DMSArray",
	Image1D => "image1D", Image2D => "image2D", Image3D => "image3D", Image2DRect => "image2DRect",
	ImageCube => "imageCube", ImageBuffer => "imageBuffer", Image1DArray => "image1DArray",
	Image2DArray => "image2DArray", ImageCubeArray => "imageCubeArray", Image2DMS => "image2DMS",
	Image2DMSArray => "image2DMSArray",
	IImage1D => "iimage1D", IImage2D => "iimage2D", IImage3D => "iimage3D", IImage2DRect => "iimage2DRect",
	IImageCube => "iimageCube", IImageBuffer => "iimageBuffer", IImage1DArray => "iimage1DArray",
	IImage2DArray => "iimage2DArray", IImageCubeArray => "iimageCubeArray", IImage2DMS => "iimage2DMS",
	IImage2DMSArray => "iimage2DMSArray",
	UImage1D => "uimage1D", UImage2D => "uimage2D", UImage3D => "uimage3D", UImage2DRect => "uimage2DRect",
	UImageCube => "uimageCube", UImageBuffer => "uimageBuffer", UImage1DArray => "uimage1DArray",
	UImage2DArray => "uimage2DArray", UImageCubeArray => "uimageCubeArray", UImage2DMS => "uimage2DMS",
	UImage2DMSArray => "uimage2DMSArray",
}

/// A storage qualifier, (including the memory qualifiers and `subroutine`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StorageQualifier {
	Const,
	In,
	Out,
	InOut,
	Centroid,
	Patch,
	Sample,
	Uniform,
	Buffer,
	Shared,
	Coherent,
	Volatile,
	Restrict,
	Readonly,
	Writeonly,
	Attribute,
	Varying,
	/// `subroutine`, with an optional list of subroutine type names, e.g. `subroutine(Fn1, Fn2)`.
	Subroutine(Vec<String>),
}

impl StorageQualifier {
	/// Returns the keyword of this qualifier.
	pub fn keyword(&self) -> &'static str {
		match self {
			Self::Const => "const",
			Self::In => "in",
			Self::Out => "out",
			Self::InOut => "inout",
			Self::Centroid => "centroid",
			Self::Patch => "patch",
			Self::Sample => "sample",
			Self::Uniform => "uniform",
			Self::Buffer => "buffer",
			Self::Shared => "shared",
			Self::Coherent => "coherent",
			Self::Volatile => "volatile",
			Self::Restrict => "restrict",
			Self::Readonly => "readonly",
			Self::Writeonly => "writeonly",
			Self::Attribute => "attribute",
			Self::Varying => "varying",
			Self::Subroutine(_) => "subroutine",
		}
	}
}

/// A precision qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Precision {
	HighP,
	MediumP,
	LowP,
}

impl Precision {
	/// Returns the keyword of this qualifier.
	pub fn keyword(&self) -> &'static str {
		match self {
			Self::HighP => "highp",
			Self::MediumP => "mediump",
			Self::LowP => "lowp",
		}
	}
}

/// An interpolation qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Interpolation {
	Smooth,
	Flat,
	NoPerspective,
}

impl Interpolation {
	/// Returns the keyword of this qualifier.
	pub fn keyword(&self) -> &'static str {
		match self {
			Self::Smooth => "smooth",
			Self::Flat => "flat",
			Self::NoPerspective => "noperspective",
		}
	}
}

/// An individual identifier within a `layout(...)` qualifier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LayoutId {
	/// The `shared` keyword.
	Shared,
	/// An identifier with an optional value, e.g. `std140` or `location = 0`.
	Identifier { name: String, value: Option<Node> },
}

/// A type qualifier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeQualifier {
	Storage(StorageQualifier),
	Layout(Vec<LayoutId>),
	Precision(Precision),
	Interpolation(Interpolation),
	Invariant,
	Precise,
}

impl TypeQualifier {
	pub fn source_string(&self) -> String {
		printing::to_string(|w| printing::write_qualifier(w, self))
	}
}

/// A type specifier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeSpecifier {
	/// A builtin type, e.g. `vec3`.
	Builtin(BuiltinType),
	/// A user-defined type referred to by name.
	Named(String),
	/// An inline struct definition.
	Struct(StructSpecifier),
	/// An array of the inner specifier. A `None` size is an unsized array, i.e. `[]`.
	Array {
		specifier: Box<TypeSpecifier>,
		size: Option<Box<Node>>,
	},
}

impl TypeSpecifier {
	/// Wraps this specifier in an array layer.
	pub fn array(self, size: Option<Node>) -> Self {
		Self::Array {
			specifier: Box::new(self),
			size: size.map(Box::new),
		}
	}

	/// Returns the innermost, non-array specifier.
	pub fn base(&self) -> &TypeSpecifier {
		match self {
			Self::Array { specifier, .. } => specifier.base(),
			_ => self,
		}
	}

	/// Returns whether the base type is a user-named type.
	pub fn is_named(&self) -> bool {
		matches!(self.base(), Self::Named(_))
	}

	/// Returns the source text of the base type, without any array suffixes.
	///
	/// Any `[..]` suffixes are produced by [`post_source_string()`](Self::post_source_string()) so that a
	/// declarator's identifier can be placed in-between, e.g. `float data[4]`.
	pub fn source_string(&self) -> String {
		printing::to_string(|w| printing::write_type_specifier(w, self))
	}

	/// Returns the array suffixes, (if any), e.g. `[4][]`.
	pub fn post_source_string(&self) -> String {
		printing::to_string(|w| printing::write_array_suffix(w, self))
	}
}

/// A struct definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StructSpecifier {
	/// The name of the struct; `None` for an anonymous struct.
	pub name: Option<String>,
	pub fields: Vec<StructField>,
}

/// A field within a struct or an interface block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StructField {
	pub ty: SpecifiedType,
	pub name: String,
}

/// A type specifier along with its qualifiers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpecifiedType {
	pub qualifiers: Vec<TypeQualifier>,
	pub specifier: TypeSpecifier,
}

impl SpecifiedType {
	/// Constructs a new type without any qualifiers.
	pub fn new(specifier: TypeSpecifier) -> Self {
		Self {
			qualifiers: Vec::new(),
			specifier,
		}
	}

	/// Returns the source text of the qualifiers and the base type. Array suffixes are produced by
	/// [`post_source_string()`](Self::post_source_string()).
	pub fn source_string(&self) -> String {
		printing::to_string(|w| printing::write_specified_type(w, self))
	}

	pub fn post_source_string(&self) -> String {
		self.specifier.post_source_string()
	}
}

impl From<BuiltinType> for SpecifiedType {
	fn from(ty: BuiltinType) -> Self {
		Self::new(TypeSpecifier::Builtin(ty))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builtin_names() {
		assert_eq!(BuiltinType::from_name("vec3"), Some(BuiltinType::Vec3));
		assert_eq!(
			BuiltinType::from_name("usampler2DMSArray"),
			Some(BuiltinType::USampler2DMSArray)
		);
		assert_eq!(BuiltinType::from_name("atomic_uint"), Some(BuiltinType::AtomicUInt));
		assert_eq!(BuiltinType::from_name("vec5"), None);
		assert_eq!(BuiltinType::DMat4x3.name(), "dmat4x3");
	}

	#[test]
	fn array_layers() {
		let ty = TypeSpecifier::Builtin(BuiltinType::Float)
			.array(Some(Node::int(2)))
			.array(None);
		assert_eq!(ty.source_string(), "float");
		assert_eq!(ty.post_source_string(), "[2][]");
		assert_eq!(ty.base(), &TypeSpecifier::Builtin(BuiltinType::Float));
		assert!(!ty.is_named());
		assert!(TypeSpecifier::Named("Light".into()).array(None).is_named());
	}

	#[test]
	fn qualified() {
		let ty = SpecifiedType {
			qualifiers: vec![
				TypeQualifier::Layout(vec![
					LayoutId::Identifier {
						name: "location".into(),
						value: Some(Node::int(0)),
					},
					LayoutId::Shared,
				]),
				TypeQualifier::Interpolation(Interpolation::Flat),
				TypeQualifier::Storage(StorageQualifier::Out),
			],
			specifier: TypeSpecifier::Builtin(BuiltinType::IVec2),
		};
		assert_eq!(
			ty.source_string(),
			"layout(location = 0, shared) flat out ivec2"
		);
		assert_eq!(
			TypeQualifier::Storage(StorageQualifier::Subroutine(vec![
				"A".into(),
				"B".into()
			]))
			.source_string(),
			"subroutine(A, B)"
		);
	}
}
