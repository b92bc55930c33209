//! Built-in demo document for runs without an input file.

pub const SAMPLE_TEXT: &str = "\
The art of reading is not merely about speed. It is about rhythm, \
comprehension, and the natural flow of language through your mind.

When you read silently, your brain processes words at varying speeds. \
Short function words fly past almost invisibly, while longer and more \
complex words demand additional processing time. Your internal voice \
naturally pauses at the boundaries between clauses, however brief those \
pauses may be.

A paced reader models that natural rhythm. Instead of displaying every \
word at the same mechanical pace, it accelerates through familiar words \
and decelerates for complexity. It pauses at punctuation, breathes \
between paragraphs, and prepares you for what comes next.

The goal is not just to read faster. It is to read naturally, at whatever \
pace feels comfortable, while training your brain to process text more \
efficiently over time.";
