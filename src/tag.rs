//! Discriminated unions and their narrowed views.
//!
//! An event union is a Rust enum whose variants each wrap one payload struct.
//! The union reports its discriminant through [`Tagged`]; every payload struct
//! declares which discriminant it carries through [`Variant`]. A tuple of 1 to
//! 4 variants forms a [`VariantSet`], whose `Narrowed` type is exactly the
//! subset of the union those variants cover.
//!
//! Use [`tagged_union!`](crate::tagged_union) to generate all of these impls
//! from one declaration so the runtime tag and the static variant never drift.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A value whose shape is identified by a discriminant.
pub trait Tagged {
    /// The closed enumeration of discriminants.
    type Tag: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// Discriminant of this value.
    fn tag(&self) -> Self::Tag;
}

/// Discriminant type of a [`Tagged`] value.
pub type TagOf<U> = <U as Tagged>::Tag;

impl<U: Tagged + ?Sized> Tagged for &U {
    type Tag = U::Tag;

    fn tag(&self) -> Self::Tag {
        (**self).tag()
    }
}

impl<U: Tagged + ?Sized> Tagged for Box<U> {
    type Tag = U::Tag;

    fn tag(&self) -> Self::Tag {
        (**self).tag()
    }
}

impl<U: Tagged + ?Sized> Tagged for Arc<U> {
    type Tag = U::Tag;

    fn tag(&self) -> Self::Tag {
        (**self).tag()
    }
}

/// One variant of an event union.
///
/// `narrow` must succeed exactly when `event.tag() == Self::TAG`.
pub trait Variant: Sized {
    /// The union this variant belongs to.
    type Union: Tagged + From<Self>;

    /// Discriminant carried by every value of this variant.
    const TAG: TagOf<Self::Union>;

    /// Take the variant out of a union value, or hand the value back.
    fn narrow(event: Self::Union) -> Result<Self, Self::Union>;

    /// Put the variant back into its union.
    fn widen(self) -> Self::Union {
        From::from(self)
    }
}

/// A statically known set of variants of one union.
///
/// Implemented for tuples of 1 to 4 [`Variant`] types that share a `Union`.
/// Larger sets are not narrowed; use [`OfTags`](crate::filter::OfTags) for
/// those.
pub trait VariantSet {
    /// The union every member belongs to.
    type Union: Tagged;

    /// The subset of the union covered by this set.
    type Narrowed: Tagged<Tag = TagOf<Self::Union>>;

    /// Discriminants of the members, in declaration order.
    fn tags() -> Vec<TagOf<Self::Union>>;

    /// Whether `tag` belongs to a member.
    fn contains(tag: TagOf<Self::Union>) -> bool;

    /// Narrow a union value, or hand it back when its tag is not a member.
    fn narrow(event: Self::Union) -> Result<Self::Narrowed, Self::Union>;

    /// Turn a narrowed value back into the union.
    fn widen(narrowed: Self::Narrowed) -> Self::Union;
}

/// Narrowed element type for a [`VariantSet`].
pub type Narrowed<S> = <S as VariantSet>::Narrowed;

/// Union of two variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OneOf2<A, B> {
    First(A),
    Second(B),
}

/// Union of three variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OneOf3<A, B, C> {
    First(A),
    Second(B),
    Third(C),
}

/// Union of four variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OneOf4<A, B, C, D> {
    First(A),
    Second(B),
    Third(C),
    Fourth(D),
}

impl<A, B> OneOf2<A, B> {
    pub fn first(&self) -> Option<&A> {
        match self {
            OneOf2::First(a) => Some(a),
            _ => None,
        }
    }

    pub fn second(&self) -> Option<&B> {
        match self {
            OneOf2::Second(b) => Some(b),
            _ => None,
        }
    }
}

impl<A, B, C> OneOf3<A, B, C> {
    pub fn first(&self) -> Option<&A> {
        match self {
            OneOf3::First(a) => Some(a),
            _ => None,
        }
    }

    pub fn second(&self) -> Option<&B> {
        match self {
            OneOf3::Second(b) => Some(b),
            _ => None,
        }
    }

    pub fn third(&self) -> Option<&C> {
        match self {
            OneOf3::Third(c) => Some(c),
            _ => None,
        }
    }
}

impl<A, B, C, D> OneOf4<A, B, C, D> {
    pub fn first(&self) -> Option<&A> {
        match self {
            OneOf4::First(a) => Some(a),
            _ => None,
        }
    }

    pub fn second(&self) -> Option<&B> {
        match self {
            OneOf4::Second(b) => Some(b),
            _ => None,
        }
    }

    pub fn third(&self) -> Option<&C> {
        match self {
            OneOf4::Third(c) => Some(c),
            _ => None,
        }
    }

    pub fn fourth(&self) -> Option<&D> {
        match self {
            OneOf4::Fourth(d) => Some(d),
            _ => None,
        }
    }
}

impl<A, B> Tagged for OneOf2<A, B>
where
    A: Tagged,
    B: Tagged<Tag = A::Tag>,
{
    type Tag = A::Tag;

    fn tag(&self) -> Self::Tag {
        match self {
            OneOf2::First(a) => a.tag(),
            OneOf2::Second(b) => b.tag(),
        }
    }
}

impl<A, B, C> Tagged for OneOf3<A, B, C>
where
    A: Tagged,
    B: Tagged<Tag = A::Tag>,
    C: Tagged<Tag = A::Tag>,
{
    type Tag = A::Tag;

    fn tag(&self) -> Self::Tag {
        match self {
            OneOf3::First(a) => a.tag(),
            OneOf3::Second(b) => b.tag(),
            OneOf3::Third(c) => c.tag(),
        }
    }
}

impl<A, B, C, D> Tagged for OneOf4<A, B, C, D>
where
    A: Tagged,
    B: Tagged<Tag = A::Tag>,
    C: Tagged<Tag = A::Tag>,
    D: Tagged<Tag = A::Tag>,
{
    type Tag = A::Tag;

    fn tag(&self) -> Self::Tag {
        match self {
            OneOf4::First(a) => a.tag(),
            OneOf4::Second(b) => b.tag(),
            OneOf4::Third(c) => c.tag(),
            OneOf4::Fourth(d) => d.tag(),
        }
    }
}

// --- VariantSet impls ---

impl<A> VariantSet for (A,)
where
    A: Variant + Tagged<Tag = TagOf<A::Union>>,
{
    type Union = A::Union;
    type Narrowed = A;

    fn tags() -> Vec<TagOf<A::Union>> {
        vec![A::TAG]
    }

    fn contains(tag: TagOf<A::Union>) -> bool {
        tag == A::TAG
    }

    fn narrow(event: A::Union) -> Result<A, A::Union> {
        if event.tag() == A::TAG {
            A::narrow(event)
        } else {
            Err(event)
        }
    }

    fn widen(narrowed: A) -> A::Union {
        narrowed.widen()
    }
}

impl<A, B> VariantSet for (A, B)
where
    A: Variant + Tagged<Tag = TagOf<A::Union>>,
    B: Variant<Union = A::Union> + Tagged<Tag = TagOf<A::Union>>,
{
    type Union = A::Union;
    type Narrowed = OneOf2<A, B>;

    fn tags() -> Vec<TagOf<A::Union>> {
        vec![A::TAG, B::TAG]
    }

    fn contains(tag: TagOf<A::Union>) -> bool {
        tag == A::TAG || tag == B::TAG
    }

    fn narrow(event: A::Union) -> Result<OneOf2<A, B>, A::Union> {
        let tag = event.tag();
        if tag == A::TAG {
            A::narrow(event).map(OneOf2::First)
        } else if tag == B::TAG {
            B::narrow(event).map(OneOf2::Second)
        } else {
            Err(event)
        }
    }

    fn widen(narrowed: OneOf2<A, B>) -> A::Union {
        match narrowed {
            OneOf2::First(a) => a.widen(),
            OneOf2::Second(b) => b.widen(),
        }
    }
}

impl<A, B, C> VariantSet for (A, B, C)
where
    A: Variant + Tagged<Tag = TagOf<A::Union>>,
    B: Variant<Union = A::Union> + Tagged<Tag = TagOf<A::Union>>,
    C: Variant<Union = A::Union> + Tagged<Tag = TagOf<A::Union>>,
{
    type Union = A::Union;
    type Narrowed = OneOf3<A, B, C>;

    fn tags() -> Vec<TagOf<A::Union>> {
        vec![A::TAG, B::TAG, C::TAG]
    }

    fn contains(tag: TagOf<A::Union>) -> bool {
        tag == A::TAG || tag == B::TAG || tag == C::TAG
    }

    fn narrow(event: A::Union) -> Result<OneOf3<A, B, C>, A::Union> {
        let tag = event.tag();
        if tag == A::TAG {
            A::narrow(event).map(OneOf3::First)
        } else if tag == B::TAG {
            B::narrow(event).map(OneOf3::Second)
        } else if tag == C::TAG {
            C::narrow(event).map(OneOf3::Third)
        } else {
            Err(event)
        }
    }

    fn widen(narrowed: OneOf3<A, B, C>) -> A::Union {
        match narrowed {
            OneOf3::First(a) => a.widen(),
            OneOf3::Second(b) => b.widen(),
            OneOf3::Third(c) => c.widen(),
        }
    }
}

impl<A, B, C, D> VariantSet for (A, B, C, D)
where
    A: Variant + Tagged<Tag = TagOf<A::Union>>,
    B: Variant<Union = A::Union> + Tagged<Tag = TagOf<A::Union>>,
    C: Variant<Union = A::Union> + Tagged<Tag = TagOf<A::Union>>,
    D: Variant<Union = A::Union> + Tagged<Tag = TagOf<A::Union>>,
{
    type Union = A::Union;
    type Narrowed = OneOf4<A, B, C, D>;

    fn tags() -> Vec<TagOf<A::Union>> {
        vec![A::TAG, B::TAG, C::TAG, D::TAG]
    }

    fn contains(tag: TagOf<A::Union>) -> bool {
        tag == A::TAG || tag == B::TAG || tag == C::TAG || tag == D::TAG
    }

    fn narrow(event: A::Union) -> Result<OneOf4<A, B, C, D>, A::Union> {
        let tag = event.tag();
        if tag == A::TAG {
            A::narrow(event).map(OneOf4::First)
        } else if tag == B::TAG {
            B::narrow(event).map(OneOf4::Second)
        } else if tag == C::TAG {
            C::narrow(event).map(OneOf4::Third)
        } else if tag == D::TAG {
            D::narrow(event).map(OneOf4::Fourth)
        } else {
            Err(event)
        }
    }

    fn widen(narrowed: OneOf4<A, B, C, D>) -> A::Union {
        match narrowed {
            OneOf4::First(a) => a.widen(),
            OneOf4::Second(b) => b.widen(),
            OneOf4::Third(c) => c.widen(),
            OneOf4::Fourth(d) => d.widen(),
        }
    }
}
