/// Something that builds a value from an argument tuple.
///
/// Implemented for every `Fn(A1, .., An) -> Out` (up to eight arguments)
/// with `Args = (A1, .., An)`; the tuple is unpacked in order and passed
/// through unchanged. This lets plain constructors such as `Counter::new`
/// be handed to [`use_class_state`](crate::use_class_state) directly.
pub trait Constructor<Args>: 'static {
    type Output;

    fn construct(&self, args: Args) -> Self::Output;
}

macro_rules! impl_constructor {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Constructor<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out + 'static,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn construct(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                (self)($($arg),*)
            }
        }
    };
}

impl_constructor!();
impl_constructor!(A1);
impl_constructor!(A1, A2);
impl_constructor!(A1, A2, A3);
impl_constructor!(A1, A2, A3, A4);
impl_constructor!(A1, A2, A3, A4, A5);
impl_constructor!(A1, A2, A3, A4, A5, A6);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7, A8);
