use crate::graph::{
    amplify::Amplify,
    gain::Gain,
    mix::Mix,
    node::GraphNode,
    through::Through,
};

pub trait NodeExt: GraphNode + Sized {
    fn amplify<M: GraphNode>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    fn through<F: GraphNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }

    fn mix<B: GraphNode>(self, other: B, balance: f32) -> Mix<Self, B> {
        Mix::new(self, other, balance)
    }

    fn gain(self, gain: f32) -> Gain<Self> {
        Gain::new(self, gain)
    }
}

impl<T: GraphNode> NodeExt for T {}
