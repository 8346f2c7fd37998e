use crate::Token;
use quickcheck::Arbitrary;

impl Arbitrary for Token<'static> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self::new(String::arbitrary(g))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.decoded().into_owned().shrink().map(Self::new))
    }
}
